mod analysis;
mod context;
mod error;
mod ioutil;
mod load;
mod names;
mod progress;
mod settings;
mod views;

pub use analysis::*;
pub use context::*;
pub use error::Error;
pub use ioutil::open_table;
pub use load::*;
pub use names::*;
pub use progress::*;
pub use settings::*;
pub use views::*;
