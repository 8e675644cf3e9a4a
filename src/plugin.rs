//! Format plugin interface and registry.
//!
//! The host library dispatches by trying each registered plugin's probe in
//! order until one recognizes the input; there is no inheritance chain,
//! just the `probe`/`read` capability interface.

use std::path::Path;
use std::sync::Arc;

use crate::assemble::assemble;
use crate::backend::RenderBackend;
use crate::error::{Error, Result};
use crate::model::{ImageArray, ImageInfo};
use crate::options::ReadOptions;
use crate::probe::{probe_bytes, ProbeOutcome};

/// Capability interface every format plugin exposes to the host.
pub trait FormatPlugin: Send + Sync {
    /// Short plugin name, e.g. `"pdf"`.
    fn name(&self) -> &str;

    /// One-line human-readable description.
    fn description(&self) -> &str;

    /// Decide whether this plugin handles the input. A negative result is
    /// `Ok(ProbeOutcome::NotRecognized)`, never an error, so the host can
    /// try the next plugin in the chain.
    fn probe(&self, data: &[u8]) -> Result<ProbeOutcome>;

    /// Decode the input into an image array plus metadata.
    fn read(&self, data: &[u8], options: &ReadOptions) -> Result<(ImageArray, ImageInfo)>;

    /// Encode an image array back into this format. Optional; the default
    /// reports that writing is not implemented.
    fn write(&self, _array: &ImageArray, _options: &ReadOptions) -> Result<Vec<u8>> {
        Err(Error::WriteNotImplemented)
    }
}

/// The PDF/PostScript format plugin.
///
/// Holds the rendering backend used for every probe and read; one plugin
/// instance serves many documents, each through its own short-lived handle.
pub struct PdfPlugin {
    backend: Arc<dyn RenderBackend>,
}

impl PdfPlugin {
    /// Create the plugin over the default pdfium backend.
    #[cfg(feature = "pdfium")]
    pub fn new() -> Self {
        Self::with_backend(Arc::new(crate::backend::PdfiumBackend::new()))
    }

    /// Create the plugin over a caller-supplied backend.
    pub fn with_backend(backend: Arc<dyn RenderBackend>) -> Self {
        Self { backend }
    }

    /// The rendering backend this plugin dispatches to.
    pub fn backend(&self) -> &dyn RenderBackend {
        self.backend.as_ref()
    }

    /// Probe the input and hand back the raw document bytes with the
    /// metadata record, without rasterizing anything.
    ///
    /// Hosts that store the source document encapsulated (rather than as
    /// pixel data) wrap the returned bytes themselves; the metadata still
    /// carries the page count, format, and document fields needed for the
    /// wrapper. Page-geometry and page-error policies do not apply since
    /// no page is rendered.
    pub fn read_encapsulated(
        &self,
        data: &[u8],
        options: &ReadOptions,
    ) -> Result<(Vec<u8>, ImageInfo)> {
        options.validate()?;
        match self.probe(data)? {
            ProbeOutcome::Recognized(doc) => {
                let info = ImageInfo::new(
                    doc.format().clone(),
                    options.dpi,
                    options.color_mode,
                    options.rotate_deg,
                    doc.page_count(),
                    Vec::new(),
                    doc.metadata(),
                );
                Ok((data.to_vec(), info))
            }
            ProbeOutcome::NotRecognized => Err(Error::UnknownFormat),
        }
    }
}

#[cfg(feature = "pdfium")]
impl Default for PdfPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatPlugin for PdfPlugin {
    fn name(&self) -> &str {
        "pdf"
    }

    fn description(&self) -> &str {
        "Read PDF and PostScript documents as image arrays"
    }

    fn probe(&self, data: &[u8]) -> Result<ProbeOutcome> {
        probe_bytes(data, self.backend.as_ref())
    }

    fn read(&self, data: &[u8], options: &ReadOptions) -> Result<(ImageArray, ImageInfo)> {
        if options.encapsulate {
            return Err(Error::InvalidParameter(
                "encapsulate produces raw document bytes, not an image array; \
                 use read_encapsulated"
                    .into(),
            ));
        }
        match self.probe(data)? {
            ProbeOutcome::Recognized(doc) => assemble(&doc, options),
            ProbeOutcome::NotRecognized => Err(Error::UnknownFormat),
        }
    }
}

/// Ordered collection of format plugins.
///
/// Registration order is dispatch order: `read_auto` probes each plugin in
/// turn and reads with the first that recognizes the input.
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn FormatPlugin>>,
}

impl PluginRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Create a registry with the default plugins (PDF over pdfium).
    #[cfg(feature = "pdfium")]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfPlugin::new()));
        registry
    }

    /// Append a plugin to the dispatch order.
    pub fn register(&mut self, plugin: Arc<dyn FormatPlugin>) {
        self.plugins.push(plugin);
    }

    /// Get a plugin by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn FormatPlugin>> {
        self.plugins.iter().find(|p| p.name() == name).cloned()
    }

    /// Names of all registered plugins, in dispatch order.
    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Probe the input with each plugin in registration order and read it
    /// with the first that recognizes it.
    ///
    /// Dispatch ends in the recognizing plugin's own `read`, so plugins
    /// that do more than probe-then-assemble keep their semantics. A
    /// plugin whose backend recognizes the signature but cannot decode
    /// the format yields to the next plugin in the chain; the
    /// unsupported-format error is reported only when no later plugin
    /// takes the input. A recognized-but-corrupt document is fatal:
    /// recognition means the input was addressed to that plugin, so the
    /// corruption error propagates instead of falling through. When no
    /// plugin recognizes the input, fails with [`Error::UnknownFormat`].
    pub fn read_auto(
        &self,
        data: &[u8],
        options: &ReadOptions,
    ) -> Result<(ImageArray, ImageInfo)> {
        let mut unsupported = None;
        for plugin in &self.plugins {
            match plugin.probe(data) {
                Ok(ProbeOutcome::Recognized(_)) => {
                    log::debug!("read_auto: dispatching to plugin {:?}", plugin.name());
                    return plugin.read(data, options);
                }
                Ok(ProbeOutcome::NotRecognized) => continue,
                Err(Error::UnsupportedFormat(format)) => {
                    log::debug!(
                        "read_auto: plugin {:?} cannot decode {}, trying next",
                        plugin.name(),
                        format
                    );
                    unsupported = Some(Error::UnsupportedFormat(format));
                }
                Err(err) => return Err(err),
            }
        }
        Err(unsupported.unwrap_or(Error::UnknownFormat))
    }

    /// Read a file with [`read_auto`](Self::read_auto) dispatch.
    pub fn read_auto_path<P: AsRef<Path>>(
        &self,
        path: P,
        options: &ReadOptions,
    ) -> Result<(ImageArray, ImageInfo)> {
        let data = std::fs::read(path)?;
        self.read_auto(&data, options)
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
