use tracing_subscriber::{reload, EnvFilter, Registry};

use crate::importer::application::ports::outgoing::{LogLevelControl, LogLevelError};

/// Swaps the `EnvFilter` installed behind a `reload::Layer`.
#[derive(Clone)]
pub struct TracingLogLevel {
    handle: reload::Handle<EnvFilter, Registry>,
}

impl TracingLogLevel {
    pub fn new(handle: reload::Handle<EnvFilter, Registry>) -> Self {
        Self { handle }
    }
}

impl LogLevelControl for TracingLogLevel {
    fn current(&self) -> Result<String, LogLevelError> {
        self.handle
            .with_current(|filter| filter.to_string())
            .map_err(|e| LogLevelError::Unavailable(e.to_string()))
    }

    fn set(&self, directive: &str) -> Result<(), LogLevelError> {
        let filter = EnvFilter::try_new(directive)
            .map_err(|_| LogLevelError::InvalidDirective(directive.to_string()))?;

        self.handle
            .reload(filter)
            .map_err(|e| LogLevelError::Unavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control() -> (TracingLogLevel, reload::Layer<EnvFilter, Registry>) {
        let (layer, handle) = reload::Layer::new(EnvFilter::new("info"));
        (TracingLogLevel::new(handle), layer)
    }

    #[test]
    fn set_replaces_the_filter() {
        let (control, _layer) = control();

        control.set("error").unwrap();

        assert_eq!(control.current().unwrap(), "error");
    }

    #[test]
    fn invalid_directive_is_rejected() {
        let (control, _layer) = control();

        let result = control.set("info,sqlx=notalevel");

        assert!(matches!(result, Err(LogLevelError::InvalidDirective(_))));
        assert_eq!(control.current().unwrap(), "info");
    }

    #[test]
    fn dropped_layer_makes_the_handle_unavailable() {
        let (control, layer) = control();
        drop(layer);

        assert!(matches!(
            control.current(),
            Err(LogLevelError::Unavailable(_))
        ));
    }
}
