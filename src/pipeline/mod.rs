pub mod command;
pub mod controller;
pub mod notifier;

pub use command::Command;
pub use controller::{
    DeliveryReport, NO_RESULTS_MESSAGE, PipelineController, PipelineSettings, PipelineState,
};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::{Destination, MessageFormat, Notifier, NotifyError, OutboundMessage};
