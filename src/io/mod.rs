//! Model I/O - saving and restoring models
//!
//! A model is persisted as a [`ModelRecord`]: class name, hyperparameters,
//! fit status, entity/relation index mappings and the trained parameters.
//! Records can be written as JSON, YAML or SafeTensors.

mod format;
mod load;
mod record;
mod save;


pub use format::{ModelFormat, SaveConfig};
pub use load::{find_default_model, read_record, restore_model, restore_model_with};
pub use record::{ModelRecord, NamedParam};
pub use save::{default_model_name, save_model, write_record, DEFAULT_MODEL_SUFFIX};
