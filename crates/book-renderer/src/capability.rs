//! Extension registration seam between the configuration and the renderer.
//!
//! Extensions never see the renderer itself. They receive a
//! [`ProcessorCapability`], which only allows registering code block
//! processors.

use book_config::{Extension, MarkdownConfig};

use crate::code_block::CodeBlockProcessor;
use crate::playground::PlaygroundProcessor;

/// What an extension may do to the markdown processor.
pub trait ProcessorCapability {
    /// Register a code block processor after the already registered ones.
    fn register(&mut self, processor: Box<dyn CodeBlockProcessor>);
}

/// Registration hook run once against a processor.
pub type ConfigHook = fn(&mut dyn ProcessorCapability);

/// Registration hook for a configured extension.
#[must_use]
pub fn hook_for(extension: Extension) -> ConfigHook {
    match extension {
        Extension::Playground => register_playground,
    }
}

fn register_playground(md: &mut dyn ProcessorCapability) {
    md.register(Box::new(PlaygroundProcessor::new()));
}

/// Run the hooks of every configured extension, in order.
pub fn apply_extensions(config: &MarkdownConfig, md: &mut dyn ProcessorCapability) {
    for &extension in &config.extensions {
        tracing::debug!(%extension, "Registering markdown extension");
        hook_for(extension)(md);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::code_block::ProcessResult;

    #[derive(Default)]
    struct Recorder {
        processors: Vec<Box<dyn CodeBlockProcessor>>,
    }

    impl ProcessorCapability for Recorder {
        fn register(&mut self, processor: Box<dyn CodeBlockProcessor>) {
            self.processors.push(processor);
        }
    }

    #[test]
    fn test_playground_hook_registers_processor() {
        let mut recorder = Recorder::default();
        hook_for(Extension::Playground)(&mut recorder);

        assert_eq!(recorder.processors.len(), 1);
        let result = recorder.processors[0].process("playground", &HashMap::new(), "<p>x</p>");
        assert!(matches!(result, ProcessResult::Inline(_)));
    }

    #[test]
    fn test_apply_extensions_from_config() {
        let config = book_config::load_config().unwrap();
        let mut recorder = Recorder::default();
        apply_extensions(&config.markdown, &mut recorder);
        assert_eq!(recorder.processors.len(), config.markdown.extensions.len());
    }

    #[test]
    fn test_apply_no_extensions() {
        let mut config = book_config::load_config().unwrap().markdown;
        config.extensions.clear();
        let mut recorder = Recorder::default();
        apply_extensions(&config, &mut recorder);
        assert!(recorder.processors.is_empty());
    }
}
