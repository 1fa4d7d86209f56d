pub mod books;

use bookservice_kernel::{settings::Settings, ModuleRegistry};

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, settings: &Settings) {
    let codec = books::BookCodec::new(books::CodecOptions::from(&settings.codec));
    registry.register(books::create_module(codec));
}
