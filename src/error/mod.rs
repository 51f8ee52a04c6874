mod cardex;

pub use cardex::CardexError;
