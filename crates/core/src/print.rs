//! Print dispatch.
//!
//! A composed document is handed to a rendering surface: the surface opens a fresh context, the
//! document is written into it, and after a short delay (so externally referenced fonts can
//! load) the context's print action runs on a detached thread.
//!
//! A surface that cannot open a context is "blocked". Dispatching to a blocked surface is not an
//! error: nothing is written, nothing is printed, and the caller gets
//! [`DispatchOutcome::Blocked`] to report however it sees fit.

use crate::config::PrintCommand;
use crate::constants::PRINT_FILE_PREFIX;
use crate::{PrescriptionError, PrescriptionResult};
use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// An opened rendering context holding one document.
pub trait RenderContext: Send {
    /// Where the document lives, for logs and callers.
    fn location(&self) -> String;

    fn write_document(&mut self, document: &str) -> PrescriptionResult<()>;

    /// Invoke the platform print action on the written document.
    fn print(&mut self) -> PrescriptionResult<()>;

    /// Drop whatever the context left behind after a failed write.
    fn discard(&mut self) {}
}

/// Something that can open rendering contexts.
pub trait RenderSurface {
    /// Open a new context, `None` when the surface is unavailable.
    fn open(&self) -> Option<Box<dyn RenderContext>>;
}

/// Result of a dispatch.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The document was written and printing is scheduled.
    Scheduled(PrintHandle),
    /// No context could be opened (or the document could not be written into it).
    Blocked,
}

impl DispatchOutcome {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, DispatchOutcome::Scheduled(_))
    }
}

/// Handle to a scheduled print.
///
/// Dropping the handle leaves the print running in the background.
#[derive(Debug)]
pub struct PrintHandle {
    location: String,
    join: JoinHandle<PrescriptionResult<()>>,
}

impl PrintHandle {
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Block until the delayed print has run.
    pub fn wait(self) -> PrescriptionResult<()> {
        self.join
            .join()
            .map_err(|_| PrescriptionError::PrintThreadPanicked)?
    }
}

/// Writes documents to a surface and prints them after a fixed delay.
#[derive(Debug, Clone)]
pub struct PrintDispatcher<S> {
    surface: S,
    delay: Duration,
}

impl<S: RenderSurface> PrintDispatcher<S> {
    pub fn new(surface: S, delay: Duration) -> Self {
        Self { surface, delay }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn dispatch(&self, document: &str) -> DispatchOutcome {
        let Some(mut context) = self.surface.open() else {
            tracing::warn!("print surface unavailable; nothing was printed");
            return DispatchOutcome::Blocked;
        };

        let location = context.location();
        if let Err(e) = context.write_document(document) {
            tracing::warn!("could not write print document to {}: {}", location, e);
            context.discard();
            return DispatchOutcome::Blocked;
        }

        let delay = self.delay;
        let spawned = thread::Builder::new()
            .name("rxpad-print".into())
            .spawn(move || {
                thread::sleep(delay);
                let result = context.print();
                if let Err(e) = &result {
                    tracing::error!("print failed for {}: {}", context.location(), e);
                }
                result
            });

        match spawned {
            Ok(join) => {
                tracing::info!("print scheduled for {} in {:?}", location, delay);
                DispatchOutcome::Scheduled(PrintHandle { location, join })
            }
            Err(e) => {
                tracing::warn!("could not start print thread: {}", e);
                DispatchOutcome::Blocked
            }
        }
    }
}

/// Surface that writes each document to a new HTML file in an output directory.
///
/// Printing runs the configured [`PrintCommand`] with the file path appended; without a command
/// the file is left for the user to open and print.
#[derive(Debug, Clone)]
pub struct FileSurface {
    output_dir: PathBuf,
    command: Option<PrintCommand>,
}

impl FileSurface {
    pub fn new(output_dir: PathBuf, command: Option<PrintCommand>) -> Self {
        Self {
            output_dir,
            command,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn create_document_file(&self) -> std::io::Result<(PathBuf, File)> {
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3fZ").to_string();

        // Two prints inside the same millisecond get a numeric suffix.
        for attempt in 0..5 {
            let name = match attempt {
                0 => format!("{PRINT_FILE_PREFIX}-{stamp}.html"),
                n => format!("{PRINT_FILE_PREFIX}-{stamp}-{n}.html"),
            };
            let candidate = self.output_dir.join(name);
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
            {
                Ok(file) => return Ok((candidate, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            }
        }

        Err(std::io::Error::new(
            ErrorKind::AlreadyExists,
            "failed to allocate a unique print document name after 5 attempts",
        ))
    }
}

impl RenderSurface for FileSurface {
    fn open(&self) -> Option<Box<dyn RenderContext>> {
        if let Err(e) = fs::create_dir_all(&self.output_dir) {
            tracing::warn!(
                "cannot create print output directory {}: {}",
                self.output_dir.display(),
                e
            );
            return None;
        }

        match self.create_document_file() {
            Ok((path, file)) => Some(Box::new(FileContext {
                path,
                file: Some(file),
                command: self.command.clone(),
            })),
            Err(e) => {
                tracing::warn!("cannot create print document: {}", e);
                None
            }
        }
    }
}

struct FileContext {
    path: PathBuf,
    file: Option<File>,
    command: Option<PrintCommand>,
}

impl RenderContext for FileContext {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn write_document(&mut self, document: &str) -> PrescriptionResult<()> {
        // The file is closed once written, mirroring a finished document load.
        let mut file = self.file.take().ok_or_else(|| {
            PrescriptionError::DocumentWrite(std::io::Error::new(
                ErrorKind::Other,
                "document already written",
            ))
        })?;
        file.write_all(document.as_bytes())
            .and_then(|_| file.flush())
            .map_err(PrescriptionError::DocumentWrite)
    }

    fn print(&mut self) -> PrescriptionResult<()> {
        let Some(command) = &self.command else {
            tracing::info!("print document ready at {}", self.path.display());
            return Ok(());
        };

        let status = Command::new(command.program())
            .args(command.args())
            .arg(&self.path)
            .status()
            .map_err(|source| PrescriptionError::PrintCommand {
                program: command.program().to_owned(),
                source,
            })?;

        if !status.success() {
            return Err(PrescriptionError::PrintCommandStatus {
                program: command.program().to_owned(),
                status,
            });
        }
        Ok(())
    }

    fn discard(&mut self) {
        self.file = None;
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!("could not remove {}: {}", self.path.display(), e);
        }
    }
}

/// What happened on a [`MemorySurface`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceEvent {
    Opened(usize),
    Written(usize, String),
    Printed(usize),
}

/// Surface that records documents in memory.
///
/// Clones share the same event log, so a test can keep one clone and hand another to a
/// dispatcher.
#[derive(Clone, Debug, Default)]
pub struct MemorySurface {
    blocked: bool,
    events: Arc<Mutex<Vec<SurfaceEvent>>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface that refuses to open, like a blocked popup.
    pub fn blocked() -> Self {
        Self {
            blocked: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn record(events: &Arc<Mutex<Vec<SurfaceEvent>>>, event: SurfaceEvent) {
        if let Ok(mut events) = events.lock() {
            events.push(event);
        }
    }
}

impl RenderSurface for MemorySurface {
    fn open(&self) -> Option<Box<dyn RenderContext>> {
        if self.blocked {
            return None;
        }
        let id = self
            .events
            .lock()
            .map(|events| {
                events
                    .iter()
                    .filter(|e| matches!(e, SurfaceEvent::Opened(_)))
                    .count()
            })
            .unwrap_or_default();
        Self::record(&self.events, SurfaceEvent::Opened(id));
        Some(Box::new(MemoryContext {
            id,
            events: Arc::clone(&self.events),
        }))
    }
}

struct MemoryContext {
    id: usize,
    events: Arc<Mutex<Vec<SurfaceEvent>>>,
}

impl RenderContext for MemoryContext {
    fn location(&self) -> String {
        format!("memory:{}", self.id)
    }

    fn write_document(&mut self, document: &str) -> PrescriptionResult<()> {
        MemorySurface::record(
            &self.events,
            SurfaceEvent::Written(self.id, document.to_owned()),
        );
        Ok(())
    }

    fn print(&mut self) -> PrescriptionResult<()> {
        MemorySurface::record(&self.events, SurfaceEvent::Printed(self.id));
        Ok(())
    }
}

/// Wrap a composed document so that a browser prints it by itself.
///
/// The returned page is the document plus an inline script that calls `window.print()` once
/// the page has loaded and `delay` has passed.
pub fn browser_print_page(document: &str, delay: Duration) -> String {
    let script = format!(
        "<script>window.addEventListener('load', function () {{ setTimeout(function () {{ window.print(); }}, {}); }});</script>\n",
        delay.as_millis()
    );

    match document.rfind("</body>") {
        Some(idx) => {
            let mut page = String::with_capacity(document.len() + script.len());
            page.push_str(&document[..idx]);
            page.push_str(&script);
            page.push_str(&document[idx..]);
            page
        }
        None => format!("{document}{script}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dispatch_writes_then_prints() {
        let surface = MemorySurface::new();
        let dispatcher = PrintDispatcher::new(surface.clone(), Duration::from_millis(5));

        let DispatchOutcome::Scheduled(handle) = dispatcher.dispatch("<html></html>") else {
            panic!("expected scheduled print");
        };
        assert_eq!(handle.location(), "memory:0");
        handle.wait().unwrap();

        assert_eq!(
            surface.events(),
            vec![
                SurfaceEvent::Opened(0),
                SurfaceEvent::Written(0, "<html></html>".into()),
                SurfaceEvent::Printed(0),
            ]
        );
    }

    #[test]
    fn test_print_waits_for_delay() {
        let surface = MemorySurface::new();
        let dispatcher = PrintDispatcher::new(surface.clone(), Duration::from_millis(300));

        let outcome = dispatcher.dispatch("doc");
        assert!(outcome.is_scheduled());
        assert!(!surface.events().contains(&SurfaceEvent::Printed(0)));

        if let DispatchOutcome::Scheduled(handle) = outcome {
            handle.wait().unwrap();
        }
        assert!(surface.events().contains(&SurfaceEvent::Printed(0)));
    }

    #[test]
    fn test_blocked_surface_is_a_silent_no_op() {
        let surface = MemorySurface::blocked();
        let dispatcher = PrintDispatcher::new(surface.clone(), Duration::ZERO);

        let outcome = dispatcher.dispatch("doc");
        assert!(matches!(outcome, DispatchOutcome::Blocked));
        assert!(surface.events().is_empty());
    }

    #[test]
    fn test_file_surface_writes_a_fresh_document_per_dispatch() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("prints");
        let dispatcher =
            PrintDispatcher::new(FileSurface::new(out.clone(), None), Duration::ZERO);

        let mut locations = Vec::new();
        for body in ["first", "second"] {
            match dispatcher.dispatch(body) {
                DispatchOutcome::Scheduled(handle) => {
                    locations.push(PathBuf::from(handle.location()));
                    handle.wait().unwrap();
                }
                DispatchOutcome::Blocked => panic!("file surface should open"),
            }
        }

        assert_ne!(locations[0], locations[1]);
        assert_eq!(fs::read_to_string(&locations[0]).unwrap(), "first");
        assert_eq!(fs::read_to_string(&locations[1]).unwrap(), "second");
        for location in &locations {
            let name = location.file_name().unwrap().to_string_lossy().to_string();
            assert!(name.starts_with("prescription-"));
            assert!(name.ends_with(".html"));
        }
    }

    #[test]
    fn test_file_surface_blocked_when_output_dir_cannot_be_created() {
        let tmp = TempDir::new().unwrap();
        let not_a_dir = tmp.path().join("occupied");
        fs::write(&not_a_dir, "file in the way").unwrap();

        let surface = FileSurface::new(not_a_dir.join("prints"), None);
        assert!(surface.open().is_none());

        let dispatcher = PrintDispatcher::new(surface, Duration::ZERO);
        assert!(matches!(dispatcher.dispatch("doc"), DispatchOutcome::Blocked));
    }

    /// Hands out file contexts that already hold a document, so the next write fails.
    struct PrewrittenSurface(FileSurface);

    impl RenderSurface for PrewrittenSurface {
        fn open(&self) -> Option<Box<dyn RenderContext>> {
            let mut context = self.0.open()?;
            context.write_document("earlier").ok()?;
            Some(context)
        }
    }

    #[test]
    fn test_failed_write_leaves_no_file_behind() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("prints");
        let dispatcher = PrintDispatcher::new(
            PrewrittenSurface(FileSurface::new(out.clone(), None)),
            Duration::ZERO,
        );

        assert!(matches!(dispatcher.dispatch("doc"), DispatchOutcome::Blocked));
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_print_program_is_reported_by_the_handle() {
        let tmp = TempDir::new().unwrap();
        let command = PrintCommand::new(
            crate::NonEmptyText::new("rxpad-no-such-print-program").unwrap(),
            vec![],
        );
        let dispatcher = PrintDispatcher::new(
            FileSurface::new(tmp.path().to_path_buf(), Some(command)),
            Duration::ZERO,
        );

        let DispatchOutcome::Scheduled(handle) = dispatcher.dispatch("doc") else {
            panic!("expected scheduled print");
        };
        assert!(matches!(
            handle.wait(),
            Err(PrescriptionError::PrintCommand { .. })
        ));
    }

    #[test]
    fn test_browser_print_page_injects_delayed_print_before_body_end() {
        let page = browser_print_page(
            "<html><body><p>Rx</p></body></html>",
            Duration::from_millis(250),
        );
        assert!(page.contains("window.print(); }, 250);"));
        let script = page.find("<script>").unwrap();
        let body_end = page.find("</body>").unwrap();
        assert!(script < body_end);
        assert!(page.starts_with("<html><body><p>Rx</p>"));
    }
}
