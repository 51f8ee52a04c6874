use cardex::config::Config;
use cardex::terminal::{Command, HELP, TerminalView, read_stdin_line};
use cardex::{Backend, CardexError, CatalogClient, ModalTarget};
use mimalloc::MiMalloc;
use std::io::Write;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.basic.loglevel));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    info!(
        base_url = %cfg.client.base_url,
        proxy = %cfg.client.proxy.as_ref().map_or("<none>", |u| u.as_str()),
        loglevel = %cfg.basic.loglevel,
        output_dir = %cfg.basic.output_dir.display(),
        search_debounce_ms = cfg.client.search_debounce_ms,
        discard_stale_loads = cfg.client.discard_stale_loads,
    );

    let view = TerminalView::new(&cfg.basic.output_dir)?;
    let client = CatalogClient::from_config(view, &cfg.client)?;
    client.init().await;
    println!("{HELP}");

    loop {
        print!("{}> ", client.active_backend());
        std::io::stdout().flush()?;

        let Some(line) = read_stdin_line().await? else {
            break;
        };
        match Command::parse(&line) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => {
                if let Err(err) = run(&client, command).await {
                    println!("error: {}", err.user_message());
                }
            }
            Ok(None) => {}
            Err(err) => println!("error: {}", err.user_message()),
        }
    }

    info!("Session ended.");
    Ok(())
}

async fn run(client: &CatalogClient<TerminalView>, command: Command) -> Result<(), CardexError> {
    let active = client.active_backend();
    match command {
        Command::Tab(backend) => client.switch_tab(backend),
        Command::Load(backend) => {
            client.load_cards(backend.unwrap_or(active), None).await;
        }
        Command::Cards(backend) => print_cards(client, backend.unwrap_or(active)),
        Command::Filter(pairs) => {
            client.update_filters(active, |filters| {
                pairs
                    .into_iter()
                    .try_for_each(|(key, value)| filters.set(&key, value))
            })?;
            client.apply_filters(active).await;
        }
        Command::Search(text) => {
            client.update_filters(active, |filters| {
                filters.search = text;
                Ok(())
            })?;
            client.apply_filters_debounced(active);
        }
        Command::Clear => client.clear_filters(active),
        Command::New => client.open_modal(active, ModalTarget::Create),
        Command::Edit(id) => client.open_edit(active, &id)?,
        Command::Set(pairs) => client.update_form(|form| {
            pairs
                .into_iter()
                .try_for_each(|(field, value)| form.set(&field, value))
        })?,
        // Failures were already reported by the controller.
        Command::Submit => {
            let _ = client.submit_form().await;
        }
        Command::Close => client.close_modal(),
        Command::Delete(id) => {
            if client.shown_card(active, &id).is_none() {
                warn!(backend = %active, %id, "Deleting a card that is not in the current grid");
            }
            let _ = client.delete_card(active, &id).await;
        }
        Command::State => println!("{}", serde_json::to_string_pretty(&client.ui_state())?),
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
    Ok(())
}

fn print_cards(client: &CatalogClient<TerminalView>, backend: Backend) {
    let cards = client.shown_cards(backend);
    if cards.is_empty() {
        println!("[{backend}] no cards shown");
        return;
    }
    for card in cards {
        println!(
            "[{backend}] {:>26}  {} ({} {}), {} GB {}",
            card.id, card.name, card.manufacturer, card.model, card.memory_gb, card.memory_type
        );
    }
}
