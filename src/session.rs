use crate::draft::AnnotationDraft;
use crate::error::{Error, Result};
use crate::layout::DatasetLayout;
use crate::media::{Playback, VideoProbe, VideoProperties};
use crate::store::{AnnotationCollection, ClickProvenance, DisplayRegion};
use crate::time_codec;
use crate::tracking::{SubjectId, TrackingIndex};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// Outcome of the last command, shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ready,
    Info(String),
    Error(String),
}

impl Status {
    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ready => write!(f, "Ready"),
            Status::Info(msg) => write!(f, "{}", msg),
            Status::Error(msg) => write!(f, "ERROR: {}", msg),
        }
    }
}

/// Which controls the shell should enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controls {
    pub play: bool,
    pub set_times: bool,
    pub add: bool,
    pub reset: bool,
    pub delete: bool,
    pub nav_prev: bool,
    pub nav_next: bool,
}

/// State loaded for the selected video.
#[derive(Debug)]
struct ActiveVideo {
    stem: String,
    file_name: String,
    properties: VideoProperties,
    tracking: TrackingIndex,
    collection: AnnotationCollection,
}

/// Command surface for the GUI shell. Owns the draft and the annotation
/// collection of the selected video; every failure becomes a [`Status`].
pub struct SessionController {
    probe: Box<dyn VideoProbe>,
    layout: Option<DatasetLayout>,
    videos: Vec<String>,
    current: Option<usize>,
    active: Option<ActiveVideo>,
    draft: AnnotationDraft,
    status: Status,
}

impl SessionController {
    pub fn new(classes: Vec<String>, probe: Box<dyn VideoProbe>) -> Result<Self> {
        Ok(Self {
            probe,
            layout: None,
            videos: Vec::new(),
            current: None,
            active: None,
            draft: AnnotationDraft::new(classes)?,
            status: Status::Ready,
        })
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn draft(&self) -> &AnnotationDraft {
        &self.draft
    }

    pub fn videos(&self) -> &[String] {
        &self.videos
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn active_video(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.stem.as_str())
    }

    pub fn video_properties(&self) -> Option<VideoProperties> {
        self.active.as_ref().map(|a| a.properties)
    }

    pub fn collection(&self) -> Option<&AnnotationCollection> {
        self.active.as_ref().map(|a| &a.collection)
    }

    pub fn annotation_strings(&self) -> Vec<String> {
        self.collection()
            .map(|c| c.display_strings())
            .unwrap_or_default()
    }

    /// Point the session at a dataset root and select its first video.
    pub fn open_root(&mut self, root: &Path) -> Status {
        self.draft.reset();
        self.active = None;
        self.current = None;
        self.videos.clear();
        self.layout = None;

        let opened = DatasetLayout::open(root).and_then(|layout| {
            let videos = layout.videos()?;
            Ok((layout, videos))
        });
        let (layout, videos) = match opened {
            Ok(v) => v,
            Err(e) => return self.fail(e),
        };

        info!("Opened dataset {} with {} videos", root.display(), videos.len());
        self.layout = Some(layout);
        self.videos = videos;

        if self.videos.is_empty() {
            return self.fail(Error::Data(format!(
                "no videos found under {}",
                root.display()
            )));
        }
        self.select_index(0)
    }

    /// Switch to `stem`. The in-progress draft is discarded whether or not the
    /// new video loads.
    pub fn select_video(&mut self, stem: &str) -> Status {
        self.draft.reset();
        self.active = None;
        self.current = self.videos.iter().position(|v| v == stem);

        match self.load_video(stem) {
            Ok(active) => {
                info!(
                    "Selected video {} ({} tracked boxes, {} annotations)",
                    stem,
                    active.tracking.len(),
                    active.collection.len()
                );
                let message = match &self.layout {
                    Some(layout) => layout.video_path(stem).display().to_string(),
                    None => stem.to_string(),
                };
                self.active = Some(active);
                self.update(Status::Info(message))
            }
            Err(e) => self.fail(e),
        }
    }

    pub fn select_index(&mut self, index: usize) -> Status {
        match self.videos.get(index).cloned() {
            Some(stem) => self.select_video(&stem),
            None => self.fail(Error::Range {
                index,
                len: self.videos.len(),
            }),
        }
    }

    pub fn next_video(&mut self) -> Status {
        match self.current {
            Some(i) if i + 1 < self.videos.len() => self.select_index(i + 1),
            _ => self.reject("already at the last video"),
        }
    }

    pub fn prev_video(&mut self) -> Status {
        match self.current {
            Some(i) if i > 0 => self.select_index(i - 1),
            _ => self.reject("already at the first video"),
        }
    }

    /// Resolve a click at widget pixel (`x`, `y`) to a tracked subject.
    ///
    /// Ignored when no video is available or the click is outside `region`.
    pub fn on_click(
        &mut self,
        x: i32,
        y: i32,
        region: DisplayRegion,
        playback: &dyn Playback,
    ) -> Option<SubjectId> {
        if !playback.is_video_available() {
            return None;
        }
        let active = self.active.as_ref()?;
        if !region.contains(x, y) {
            debug!("Click ({}, {}) outside display region {}", x, y, region);
            return None;
        }

        let point = region.normalize(x, y);
        let frame = time_codec::frame_of(playback.position_ms(), active.properties.fps);
        let hit = active.tracking.hit_test(
            point,
            frame,
            active.properties.width,
            active.properties.height,
        );

        self.draft.record_click(ClickProvenance { region, x, y });
        self.draft.set_subject(hit);

        let status = match hit {
            Some(id) => Status::Info(format!("Picked subject {} at frame {}", id, frame)),
            None => Status::Info(format!("No tracked subject at frame {}", frame)),
        };
        debug!("{}", status);
        self.update(status);
        hit
    }

    pub fn on_set_start(&mut self, playback: &dyn Playback) -> Status {
        let fps = match self.require_fps() {
            Ok(fps) => fps,
            Err(e) => return self.fail(e),
        };
        let position = playback.position_ms();
        self.draft.set_start(position, fps);
        self.update(Status::Info(format!(
            "Start set to {}",
            time_codec::to_display(position)
        )))
    }

    pub fn on_set_stop(&mut self, playback: &dyn Playback) -> Status {
        let fps = match self.require_fps() {
            Ok(fps) => fps,
            Err(e) => return self.fail(e),
        };
        let position = playback.position_ms();
        self.draft.set_stop(position, fps);
        self.update(Status::Info(format!(
            "Stop set to {}",
            time_codec::to_display(position)
        )))
    }

    pub fn on_select_label(&mut self, index: usize) -> Status {
        match self.draft.select_label(index) {
            Ok(()) => {
                let label = self.draft.label().to_string();
                self.update(Status::Info(format!("Class set to {}", label)))
            }
            Err(e) => self.fail(e),
        }
    }

    pub fn on_set_label(&mut self, label: &str) -> Status {
        match self.draft.set_label(label) {
            Ok(()) => self.update(Status::Info(format!("Class set to {}", label))),
            Err(e) => self.fail(e),
        }
    }

    /// Commit the draft into the active collection. The draft survives a
    /// failed write so the annotation can be retried.
    pub fn on_add(&mut self) -> Status {
        let active = match self.active.as_mut() {
            Some(active) => active,
            None => return self.reject("no video selected"),
        };

        let result = self
            .draft
            .to_record(&active.file_name)
            .and_then(|record| {
                let summary = record.display_string();
                active.collection.append(record)?;
                Ok(summary)
            });

        match result {
            Ok(summary) => {
                self.draft.reset();
                self.update(Status::Info(format!("Added {}", summary)))
            }
            Err(e) => self.fail(e),
        }
    }

    pub fn on_delete(&mut self, index: usize) -> Status {
        let active = match self.active.as_mut() {
            Some(active) => active,
            None => return self.reject("no video selected"),
        };

        match active.collection.delete(index) {
            Ok(removed) => self.update(Status::Info(format!(
                "Deleted {}",
                removed.display_string()
            ))),
            Err(e) => self.fail(e),
        }
    }

    pub fn on_reset(&mut self) -> Status {
        self.draft.reset();
        self.update(Status::Ready)
    }

    /// Playback position (ms) at the start of annotation `index`.
    pub fn seek_target(&self, index: usize) -> Option<u64> {
        self.collection()?
            .get(index)
            .map(|r| r.start_time_seconds * 1000)
    }

    pub fn elapsed_text(&self, playback: &dyn Playback) -> String {
        match &self.active {
            Some(active) => time_codec::elapsed_text(
                playback.position_ms(),
                playback.duration_ms(),
                active.properties.fps,
                active.properties.frame_count,
            ),
            None => time_codec::elapsed_text(0, 0, 1.0, 0),
        }
    }

    pub fn controls(&self) -> Controls {
        let loaded = self.active.is_some();
        Controls {
            play: loaded,
            set_times: loaded,
            add: loaded && self.draft.is_committable(),
            reset: !self.draft.is_pristine(),
            delete: self.collection().map_or(false, |c| !c.is_empty()),
            nav_prev: matches!(self.current, Some(i) if i > 0),
            nav_next: matches!(self.current, Some(i) if i + 1 < self.videos.len()),
        }
    }

    fn load_video(&self, stem: &str) -> Result<ActiveVideo> {
        let layout = self
            .layout
            .as_ref()
            .ok_or_else(|| Error::State("no dataset directory opened".to_string()))?;

        let properties = self.probe.probe(&layout.video_path(stem))?;
        let tracking = TrackingIndex::open(&layout.tracking_path(stem))?;
        let collection = AnnotationCollection::load(&layout.annotations_path(stem))?;

        Ok(ActiveVideo {
            stem: stem.to_string(),
            file_name: DatasetLayout::video_file_name(stem),
            properties,
            tracking,
            collection,
        })
    }

    fn require_fps(&self) -> Result<f64> {
        self.active
            .as_ref()
            .map(|a| a.properties.fps)
            .ok_or_else(|| Error::State("no video selected".to_string()))
    }

    fn update(&mut self, status: Status) -> Status {
        self.status = status.clone();
        status
    }

    fn reject(&mut self, reason: &str) -> Status {
        self.fail(Error::State(reason.to_string()))
    }

    fn fail(&mut self, err: Error) -> Status {
        warn!("{}", err);
        self.update(Status::Error(err.to_string()))
    }
}
