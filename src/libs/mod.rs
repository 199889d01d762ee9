pub mod cheapshark;
pub mod sort;
pub mod terminal;
pub mod variable;
pub mod version;
pub mod widget;
