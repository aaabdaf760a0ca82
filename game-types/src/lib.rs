mod marks;
mod settings;

pub use marks::*;
pub use settings::*;
