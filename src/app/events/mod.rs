//! AppIntent- und AppCommand-Enums für den Intent/Command-Datenfluss,
//! sowie der typisierte Event-Bus der Interaktions-Komponenten.

mod bus;
mod command;
mod intent;

pub use bus::{EventBus, SubscriberId};
pub use command::AppCommand;
pub use intent::AppIntent;
