pub mod function;
pub mod key;
pub mod object;
pub mod string;
pub mod symbols;
pub mod value;
