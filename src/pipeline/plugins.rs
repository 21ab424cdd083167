//! In-process extension listeners.
//!
//! Plugins are notified at fixed lifecycle events, in registration order, and may edit the state they are handed.
//! The first listener failure stops the run.

use std::fmt;

use bridgejs_model::ResolvedProgram;

use crate::backend::emit::{EmissionOutput, ListenerFault, OutputUnit, UnitKey, UnitObserver};
use crate::config::Config;

/// Error returned by a listener.
pub type PluginError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    ConfigRead,
    BeforeEmit,
    BeforeUnit,
    AfterUnit,
    AfterEmit,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Event::ConfigRead => "config read",
            Event::BeforeEmit => "before emit",
            Event::BeforeUnit => "before unit",
            Event::AfterUnit => "after unit",
            Event::AfterEmit => "after emit",
        })
    }
}

/// A lifecycle listener. Every method defaults to doing nothing.
pub trait Plugin {
    fn name(&self) -> &str;

    /// The parsed configuration, before validation.
    fn on_config_read(&mut self, _config: &mut Config) -> Result<(), PluginError> {
        Ok(())
    }

    fn before_emit(&mut self, _program: &mut ResolvedProgram) -> Result<(), PluginError> {
        Ok(())
    }

    fn before_unit(&mut self, _key: &UnitKey) -> Result<(), PluginError> {
        Ok(())
    }

    fn after_unit(&mut self, _unit: &mut OutputUnit) -> Result<(), PluginError> {
        Ok(())
    }

    fn after_emit(&mut self, _output: &mut EmissionOutput) -> Result<(), PluginError> {
        Ok(())
    }
}

/// Registered plugins, dispatched in registration order.
#[derive(Default)]
pub struct Plugins {
    plugins: Vec<Box<dyn Plugin>>,
}

impl Plugins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        tracing::debug!(plugin = plugin.name(), "plugin registered");
        self.plugins.push(plugin);
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    fn dispatch(
        &mut self,
        event: Event,
        mut f: impl FnMut(&mut dyn Plugin) -> Result<(), PluginError>,
    ) -> Result<(), ListenerFault> {
        for plugin in &mut self.plugins {
            f(plugin.as_mut()).map_err(|e| ListenerFault {
                listener: plugin.name().to_string(),
                event: event.to_string(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    pub fn config_read(&mut self, config: &mut Config) -> Result<(), ListenerFault> {
        self.dispatch(Event::ConfigRead, |p| p.on_config_read(config))
    }

    pub fn before_emit(&mut self, program: &mut ResolvedProgram) -> Result<(), ListenerFault> {
        self.dispatch(Event::BeforeEmit, |p| p.before_emit(program))
    }

    pub fn after_emit(&mut self, output: &mut EmissionOutput) -> Result<(), ListenerFault> {
        self.dispatch(Event::AfterEmit, |p| p.after_emit(output))
    }
}

impl UnitObserver for Plugins {
    fn before_unit(&mut self, key: &UnitKey) -> Result<(), ListenerFault> {
        self.dispatch(Event::BeforeUnit, |p| p.before_unit(key))
    }

    fn after_unit(&mut self, unit: &mut OutputUnit) -> Result<(), ListenerFault> {
        self.dispatch(Event::AfterUnit, |p| p.after_unit(unit))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    struct Recorder {
        name: &'static str,
        log: Log,
        fail_on: Option<Event>,
    }

    impl Recorder {
        fn record(&self, event: Event) -> Result<(), PluginError> {
            self.log.lock().unwrap().push(format!("{}:{}", self.name, event));
            if self.fail_on == Some(event) {
                return Err(format!("{} refused", self.name).into());
            }
            Ok(())
        }
    }

    impl Plugin for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn on_config_read(&mut self, config: &mut Config) -> Result<(), PluginError> {
            config.define_constants.push(self.name.to_uppercase());
            self.record(Event::ConfigRead)
        }

        fn before_unit(&mut self, _key: &UnitKey) -> Result<(), PluginError> {
            self.record(Event::BeforeUnit)
        }
    }

    fn plugins(log: &Log, fail_on: Option<Event>) -> Plugins {
        let mut plugins = Plugins::new();
        plugins.register(Box::new(Recorder {
            name: "first",
            log: log.clone(),
            fail_on,
        }));
        plugins.register(Box::new(Recorder {
            name: "second",
            log: log.clone(),
            fail_on: None,
        }));
        plugins
    }

    #[test]
    fn listeners_run_in_registration_order_and_may_edit_config() {
        let log = Log::default();
        let mut config = Config::default();
        plugins(&log, None).config_read(&mut config).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["first:config read", "second:config read"]);
        assert_eq!(config.define_constants, vec!["FIRST", "SECOND"]);
    }

    #[test]
    fn first_failure_stops_dispatch() {
        let log = Log::default();
        let fault = plugins(&log, Some(Event::BeforeUnit))
            .before_unit(&UnitKey::Project("App".to_string()))
            .unwrap_err();
        assert_eq!(fault.listener, "first");
        assert_eq!(fault.event, "before unit");
        assert_eq!(fault.message, "first refused");
        assert_eq!(log.lock().unwrap().len(), 1);
    }
}
