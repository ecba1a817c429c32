//! Image files as a capture device
//!
//! Stands in for a camera on machines without one: each image file is a
//! frame. A watched directory keeps the device open and picks up new
//! snapshots as they land (via [`FolderWatcher`]), which is how handheld
//! scanners that save to a shared folder are used at the desk.
//!
//! A file is delivered at most once per backend, across re-acquisitions.

use crate::watch::FolderWatcher;
use image::DynamicImage;
use parking_lot::Mutex;
use inlove_scanner::{
    CameraInfo, CameraRequest, CaptureBackend, CaptureEnvironment, CaptureError, FrameSource,
};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Camera id reported for the file device
pub const FILE_CAMERA_ID: &str = "files";

/// Quiet time after a file lands in the watched folder before it is read
pub const WATCH_DEBOUNCE: Duration = Duration::from_millis(250);

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Image files in a directory, sorted by name
fn list_images(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_image(p))
        .collect();
    paths.sort();
    Ok(paths)
}

/// Where frames come from
#[derive(Debug, Clone)]
pub enum FrameInput {
    /// A fixed list of image files; the stream ends after the last one
    Files(Vec<PathBuf>),
    /// A directory watched for new images until the device is released
    Watch(PathBuf),
}

/// Capture backend reading frames from image files
#[derive(Debug, Clone)]
pub struct ImageFileBackend {
    input: FrameInput,
    env: CaptureEnvironment,
    consumed: Arc<Mutex<HashSet<PathBuf>>>,
}

impl ImageFileBackend {
    pub fn new(input: FrameInput, env: CaptureEnvironment) -> Self {
        Self {
            input,
            env,
            consumed: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Build from CLI paths: a single directory with `watch` set is watched,
    /// directories otherwise expand to the images they contain
    pub fn from_paths(paths: &[PathBuf], watch: bool, env: CaptureEnvironment) -> Self {
        let input = match paths {
            [dir] if watch && dir.is_dir() => FrameInput::Watch(dir.clone()),
            _ => {
                let mut files = Vec::new();
                for path in paths {
                    if path.is_dir() {
                        match list_images(path) {
                            Ok(found) => files.extend(found),
                            Err(e) => warn!(path = %path.display(), error = %e, "Failed to list directory"),
                        }
                    } else {
                        files.push(path.clone());
                    }
                }
                FrameInput::Files(files)
            }
        };
        Self::new(input, env)
    }

    pub fn input(&self) -> &FrameInput {
        &self.input
    }

    /// Files already delivered as frames
    pub fn consumed(&self) -> usize {
        self.consumed.lock().len()
    }
}

impl CaptureBackend for ImageFileBackend {
    type Source = ImageFileSource;

    fn environment(&self) -> CaptureEnvironment {
        self.env
    }

    async fn list_cameras(&self) -> Result<Vec<CameraInfo>, CaptureError> {
        let label = match &self.input {
            FrameInput::Files(files) => format!("Image files ({})", files.len()),
            FrameInput::Watch(dir) => format!("Watched folder {}", dir.display()),
        };
        Ok(vec![CameraInfo::new(FILE_CAMERA_ID, label)])
    }

    async fn acquire(&self, request: &CameraRequest) -> Result<ImageFileSource, CaptureError> {
        debug!(request = %request.describe(), "Acquiring file device");
        match &self.input {
            FrameInput::Files(files) => {
                if files.is_empty() {
                    return Err(CaptureError::DeviceNotFound);
                }
                if let Some(missing) = files.iter().find(|p| !p.exists()) {
                    warn!(path = %missing.display(), "Frame file does not exist");
                    return Err(CaptureError::DeviceNotFound);
                }
                let pending: Vec<PathBuf> = {
                    let consumed = self.consumed.lock();
                    files.iter().filter(|p| !consumed.contains(*p)).cloned().collect()
                };
                if pending.is_empty() {
                    return Err(CaptureError::DeviceNotFound);
                }
                Ok(ImageFileSource::files(pending, self.consumed.clone()))
            }
            FrameInput::Watch(dir) => {
                if !dir.is_dir() {
                    return Err(CaptureError::DeviceNotFound);
                }
                let watcher = FolderWatcher::new(dir.clone(), WATCH_DEBOUNCE).map_err(|e| {
                    CaptureError::Unknown(format!("cannot watch {}: {}", dir.display(), e))
                })?;
                let mut source = ImageFileSource::watch(watcher, self.consumed.clone());
                // snapshots saved before the device opened
                match list_images(dir) {
                    Ok(paths) => source.enqueue(paths),
                    Err(e) => warn!(path = %dir.display(), error = %e, "Failed to list watched folder"),
                }
                Ok(source)
            }
        }
    }
}

/// Acquired file device
#[derive(Debug)]
pub struct ImageFileSource {
    queue: VecDeque<PathBuf>,
    watcher: Option<FolderWatcher>,
    consumed: Arc<Mutex<HashSet<PathBuf>>>,
    released: bool,
}

impl ImageFileSource {
    fn files(files: Vec<PathBuf>, consumed: Arc<Mutex<HashSet<PathBuf>>>) -> Self {
        Self {
            queue: files.into(),
            watcher: None,
            consumed,
            released: false,
        }
    }

    fn watch(watcher: FolderWatcher, consumed: Arc<Mutex<HashSet<PathBuf>>>) -> Self {
        Self {
            queue: VecDeque::new(),
            watcher: Some(watcher),
            consumed,
            released: false,
        }
    }

    /// Queue images not yet delivered
    fn enqueue(&mut self, paths: Vec<PathBuf>) {
        let consumed = self.consumed.lock();
        for path in paths {
            if is_image(&path) && path.is_file() && !consumed.contains(&path) && !self.queue.contains(&path) {
                self.queue.push_back(path);
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

async fn load_frame(path: PathBuf) -> Option<DynamicImage> {
    let shown = path.display().to_string();
    match tokio::task::spawn_blocking(move || image::open(&path)).await {
        Ok(Ok(img)) => Some(img),
        Ok(Err(e)) => {
            warn!(path = %shown, error = %e, "Skipping unreadable frame");
            None
        }
        Err(e) => {
            warn!(path = %shown, error = %e, "Frame load task failed");
            None
        }
    }
}

impl FrameSource for ImageFileSource {
    type Frame = DynamicImage;

    async fn next_frame(&mut self) -> Option<DynamicImage> {
        loop {
            if self.released {
                return None;
            }

            if let Some(path) = self.queue.pop_front() {
                self.consumed.lock().insert(path.clone());
                debug!(path = %path.display(), "Frame");
                match load_frame(path).await {
                    Some(frame) => return Some(frame),
                    None => continue,
                }
            }

            // a file list ends here; a watched folder waits for the next batch
            let changed = self.watcher.as_mut()?.changed().await?;
            self.enqueue(changed);
        }
    }

    fn release(&mut self) {
        self.released = true;
        self.queue.clear();
        self.watcher = None;
    }
}
