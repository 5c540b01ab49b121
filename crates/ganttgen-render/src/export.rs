//! PNG export through a headless rendering surface
//!
//! A [`SurfaceLauncher`] acquires a [`RenderSurface`] for one capture. The
//! surface is released when dropped, on success and on every error path.
//! The shipped surface drives a Chromium-family browser in headless mode.

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use image::{imageops, DynamicImage, ImageFormat};
use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// Environment variable naming the browser binary
pub const BROWSER_ENV: &str = "GANTTGEN_CHROME";

const BROWSER_NAMES: [&str; 7] = [
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "chrome",
    "microsoft-edge",
    "msedge",
];

const POLL_INTERVAL: Duration = Duration::from_millis(50);

// ============================================================================
// Errors
// ============================================================================

/// PNG export error
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No headless browser found; set GANTTGEN_CHROME or export.chrome")]
    BrowserNotFound,

    #[error("Failed to launch {}: {source}", .program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Document not found: {}", .0.display())]
    MissingDocument(PathBuf),

    #[error("Cannot address {} as a file URL", .0.display())]
    DocumentUrl(PathBuf),

    #[error("Rendering did not finish within {0:?}")]
    Timeout(Duration),

    #[error("Browser exited with {status}: {log}")]
    BrowserFailed { status: ExitStatus, log: String },

    #[error("No document has been opened on the surface")]
    NotOpened,

    #[error("Browser produced no screenshot")]
    NoCapture,

    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

// ============================================================================
// Surface traits
// ============================================================================

/// Viewport and timing for one capture
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureSettings {
    pub width: u32,
    pub height: u32,
    /// Virtual time granted to layout and entry animations before capture
    pub virtual_time_budget: Duration,
    /// Wall-clock limit for the whole capture
    pub timeout: Duration,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            virtual_time_budget: Duration::from_millis(3000),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Acquires a rendering surface for a single capture
pub trait SurfaceLauncher {
    fn launch(&self) -> Result<Box<dyn RenderSurface>, ExportError>;
}

/// A short-lived rendering surface, released on drop
pub trait RenderSurface {
    /// Load the document and block until layout has settled
    fn open(&mut self, document: &Path) -> Result<(), ExportError>;

    /// PNG bytes of the loaded document on a transparent background
    fn capture(&mut self) -> Result<Vec<u8>, ExportError>;
}

// ============================================================================
// Exporter
// ============================================================================

/// Rasterizes assembled chart documents
#[derive(Clone, Debug)]
pub struct PngExporter<L> {
    launcher: L,
}

impl<L: SurfaceLauncher> PngExporter<L> {
    pub fn new(launcher: L) -> Self {
        Self { launcher }
    }

    /// Export next to the document, swapping the extension for `.png`
    pub fn export(&self, document: &Path) -> Result<PathBuf, ExportError> {
        self.export_to(document, &document.with_extension("png"))
    }

    /// Export to an explicit destination
    pub fn export_to(&self, document: &Path, destination: &Path) -> Result<PathBuf, ExportError> {
        if !document.is_file() {
            return Err(ExportError::MissingDocument(document.to_path_buf()));
        }

        let raw = {
            let mut surface = self.launcher.launch()?;
            surface.open(document)?;
            surface.capture()?
        };

        let trimmed = trim_transparent(&raw)?;
        fs::write(destination, trimmed)?;
        info!(path = %destination.display(), "Exported PNG");
        Ok(destination.to_path_buf())
    }
}

/// Crop a PNG to the bounding box of its non-transparent pixels.
///
/// Fully transparent images are returned unchanged.
pub fn trim_transparent(png: &[u8]) -> Result<Vec<u8>, ExportError> {
    let image = image::load_from_memory(png)?.to_rgba8();

    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }

    let Some((x0, y0, x1, y1)) = bounds else {
        return Ok(png.to_vec());
    };

    let cropped = imageops::crop_imm(&image, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image();
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(cropped).write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

// ============================================================================
// Headless browser surface
// ============================================================================

/// Launches a headless Chromium-family browser
#[derive(Clone, Debug, Default)]
pub struct ChromeLauncher {
    /// Explicit browser binary; otherwise the environment and PATH are searched
    pub binary: Option<PathBuf>,
    pub settings: CaptureSettings,
}

impl ChromeLauncher {
    pub fn new(settings: CaptureSettings) -> Self {
        Self {
            binary: None,
            settings,
        }
    }

    /// Use a specific browser binary
    pub fn binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.binary = Some(path.into());
        self
    }
}

impl SurfaceLauncher for ChromeLauncher {
    fn launch(&self) -> Result<Box<dyn RenderSurface>, ExportError> {
        let binary = self
            .binary
            .clone()
            .or_else(find_browser)
            .ok_or(ExportError::BrowserNotFound)?;
        let scratch = tempfile::Builder::new().prefix("ganttgen-").tempdir()?;
        debug!(browser = %binary.display(), scratch = %scratch.path().display(), "Launching browser surface");

        Ok(Box::new(ChromeSurface {
            binary,
            settings: self.settings.clone(),
            scratch,
            child: None,
            screenshot: None,
        }))
    }
}

/// Browser from `GANTTGEN_CHROME`, else the first known name on `PATH`
pub fn find_browser() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(BROWSER_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(path));
    }
    BROWSER_NAMES.iter().find_map(|name| which::which(name).ok())
}

/// First known browser name found in an explicit search path
pub fn find_browser_in(paths: &OsStr) -> Option<PathBuf> {
    BROWSER_NAMES
        .iter()
        .find_map(|name| which::which_in(name, Some(paths), ".").ok())
}

struct ChromeSurface {
    binary: PathBuf,
    settings: CaptureSettings,
    /// Removed together with its contents when the surface drops
    scratch: TempDir,
    child: Option<Child>,
    screenshot: Option<PathBuf>,
}

impl ChromeSurface {
    fn wait_for_exit(&mut self) -> Result<ExitStatus, ExportError> {
        let deadline = Instant::now() + self.settings.timeout;
        let Some(child) = self.child.as_mut() else {
            return Err(ExportError::NotOpened);
        };
        loop {
            if let Some(status) = child.try_wait()? {
                self.child = None;
                return Ok(status);
            }
            if Instant::now() >= deadline {
                child.kill().ok();
                child.wait().ok();
                self.child = None;
                return Err(ExportError::Timeout(self.settings.timeout));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl RenderSurface for ChromeSurface {
    fn open(&mut self, document: &Path) -> Result<(), ExportError> {
        let document = fs::canonicalize(document)?;
        let screenshot = self.scratch.path().join("capture.png");
        let profile = self.scratch.path().join("profile");
        let log_path = self.scratch.path().join("browser.log");
        let log = File::create(&log_path)?;

        let child = Command::new(&self.binary)
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--hide-scrollbars")
            .arg("--no-first-run")
            .arg("--default-background-color=00000000")
            .arg(format!("--user-data-dir={}", profile.display()))
            .arg(format!(
                "--window-size={},{}",
                self.settings.width, self.settings.height
            ))
            .arg(format!(
                "--virtual-time-budget={}",
                self.settings.virtual_time_budget.as_millis()
            ))
            .arg(format!("--screenshot={}", screenshot.display()))
            .arg(file_url(&document)?.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(log))
            .spawn()
            .map_err(|source| ExportError::Launch {
                program: self.binary.clone(),
                source,
            })?;
        self.child = Some(child);

        let status = self.wait_for_exit()?;
        if !status.success() {
            let log = fs::read_to_string(&log_path).unwrap_or_default();
            return Err(ExportError::BrowserFailed {
                status,
                log: log.lines().rev().take(5).collect::<Vec<_>>().join(" | "),
            });
        }
        self.screenshot = Some(screenshot);
        Ok(())
    }

    fn capture(&mut self) -> Result<Vec<u8>, ExportError> {
        let path = self.screenshot.as_ref().ok_or(ExportError::NotOpened)?;
        if !path.is_file() {
            return Err(ExportError::NoCapture);
        }
        Ok(fs::read(path)?)
    }
}

impl Drop for ChromeSurface {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            child.kill().ok();
            child.wait().ok();
        }
    }
}

fn file_url(path: &Path) -> Result<Url, ExportError> {
    Url::from_file_path(path).map_err(|()| ExportError::DocumentUrl(path.to_path_buf()))
}
