//! Headless entry point: button words on stdin, the visible listing on stdout.
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use romshelf::animation::{AnimationSequencer, FixedAdvanceLabels, HighlightFrame, Transition};
use romshelf::assets::{
    ArtTracker, AssetLoader, AssetRequest, RedrawFlag, RgbaDecoder, SharedImage, thumbnail_path,
};
use romshelf::config::{self, AppConfig};
use romshelf::launch::{self, PakEmulators};
use romshelf::library::LibraryPaths;
use romshelf::logging;
use romshelf::session::{Outcome, Session};

/// Pixel advance used to crop highlight labels.
const LABEL_ADVANCE: i32 = 8;
/// Box the thumbnail is scaled into.
const THUMBNAIL_BOX: (u32, u32) = (240, 240);
/// Poll interval while waiting for the next animation frame.
const FRAME_TICK: Duration = Duration::from_millis(16);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let mut config = config::load_or_default().unwrap_or_else(|err| {
        tracing::warn!("Using default settings: {err}");
        AppConfig::default()
    });
    if let Some(root) = std::env::args_os().nth(1) {
        config.library.root = PathBuf::from(root);
    }
    let paths = LibraryPaths::from_settings(&config.library);
    let emulators = PakEmulators::new(&paths);
    if let Some(request) = launch::auto_resume(&paths, &emulators) {
        request.queue(&paths)?;
        return Ok(());
    }
    let mut session = Session::start(
        paths,
        config.features,
        config.layout.page_size,
        Box::new(emulators),
    );

    let redraw = RedrawFlag::new();
    let background = SharedImage::new(redraw.clone());
    let thumbnail = SharedImage::new(redraw.clone());
    let settle = Duration::from_millis(config.assets.settle_ms);
    let background_loader = AssetLoader::spawn("background", RgbaDecoder, settle)?;
    let thumbnail_loader = AssetLoader::spawn("thumbnail", RgbaDecoder, settle)?;
    let mut art = ArtTracker::new();

    let highlight: Arc<Mutex<Option<HighlightFrame>>> = Arc::new(Mutex::new(None));
    let sequencer = {
        let highlight = Arc::clone(&highlight);
        let redraw = redraw.clone();
        AnimationSequencer::spawn(FixedAdvanceLabels::new(LABEL_ADVANCE), move |frame| {
            *highlight.lock().expect("highlight poisoned") = Some(frame);
            redraw.request();
        })?
    };

    let loaders = ArtLoaders {
        background: background_loader,
        thumbnail: thumbnail_loader,
        background_slot: background,
        thumbnail_slot: thumbnail,
    };
    loaders.request(&session, &mut art);
    render(&session)?;
    present(&redraw, &highlight, &loaders);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let word = line.trim();
        if word.is_empty() {
            continue;
        }
        let row_before = selected_row(&session);
        let depth_before = session.depth();
        let page = session.page_size() as isize;
        let result = match word {
            "up" => Ok(step(&mut session, -1, true)),
            "up+" => Ok(step(&mut session, -1, false)),
            "down" => Ok(step(&mut session, 1, true)),
            "down+" => Ok(step(&mut session, 1, false)),
            "left" => Ok(step(&mut session, -page, false)),
            "right" => Ok(step(&mut session, page, false)),
            "l1" => Ok(session.jump_alpha(false).then_some(Outcome::Browsing)),
            "r1" => Ok(session.jump_alpha(true).then_some(Outcome::Browsing)),
            "a" => session.open_selected(false).map(Some),
            "x" => session.open_selected(true).map(Some),
            "b" => Ok(session.close().then_some(Outcome::Browsing)),
            "y" => Ok(session.remove_recent().then_some(Outcome::Browsing)),
            "quit" => {
                session.save_position();
                break;
            }
            other => {
                tracing::debug!("Ignoring unknown button {other}");
                Ok(None)
            }
        };

        match result {
            Ok(Some(Outcome::Launch(request))) => {
                if let Err(err) = request.queue(session.paths()) {
                    tracing::error!("Launch failed: {err}");
                    continue;
                }
                break;
            }
            Ok(Some(Outcome::Browsing)) => {
                let row_after = selected_row(&session);
                if let Some(entry) = session.selected_entry() {
                    let from = if session.depth() == depth_before {
                        row_before
                    } else {
                        row_after
                    };
                    sequencer.submit(Transition::between_rows(
                        from,
                        row_after,
                        entry.label(),
                        &config.layout,
                        session.features(),
                    ));
                }
                loaders.request(&session, &mut art);
            }
            Ok(None) => {}
            Err(err) => tracing::warn!("Cannot open selection: {err}"),
        }

        render(&session)?;
        sequencer.run_until_idle(FRAME_TICK, || present(&redraw, &highlight, &loaders));
        present(&redraw, &highlight, &loaders);
    }

    sequencer.shutdown();
    loaders.background.shutdown();
    loaders.thumbnail.shutdown();
    Ok(())
}

fn step(session: &mut Session, delta: isize, wrap: bool) -> Option<Outcome> {
    session.move_selection(delta, wrap).then_some(Outcome::Browsing)
}

fn selected_row(session: &Session) -> usize {
    let top = session.top();
    top.selected.saturating_sub(top.start)
}

/// The two art workers and the slots they fill.
struct ArtLoaders {
    background: AssetLoader,
    thumbnail: AssetLoader,
    background_slot: Arc<SharedImage>,
    thumbnail_slot: Arc<SharedImage>,
}

impl ArtLoaders {
    fn request(&self, session: &Session, art: &mut ArtTracker) {
        let Some(entry) = session.selected_entry() else {
            art.reset();
            return;
        };
        if let Some(path) = art.background_request(entry, session.paths(), session.features()) {
            self.background
                .enqueue(AssetRequest::new(path, self.background_slot.installer()));
        }
        match thumbnail_path(entry, session.features()) {
            Some(path) => {
                let install = self
                    .thumbnail_slot
                    .fitting_installer(THUMBNAIL_BOX.0, THUMBNAIL_BOX.1);
                self.thumbnail.enqueue(AssetRequest::new(path, install));
            }
            None => self.thumbnail_slot.install(None),
        }
    }
}

fn render(session: &Session) -> io::Result<()> {
    let top = session.top();
    let mut out = io::stdout().lock();
    writeln!(out, "== {} ==", top.name)?;
    if top.is_empty() {
        writeln!(out, "   (empty)")?;
    }
    for (offset, entry) in top.visible().iter().enumerate() {
        let marker = if top.start + offset == top.selected { '>' } else { ' ' };
        writeln!(out, "{marker}  {}", entry.label())?;
    }
    let resume = session.resume();
    if resume.can_resume {
        writeln!(out, "   [x] resume")?;
    }
    out.flush()
}

/// Draw whatever changed since the last call: the highlight frame and art slots.
fn present(redraw: &RedrawFlag, highlight: &Mutex<Option<HighlightFrame>>, loaders: &ArtLoaders) {
    if !redraw.take() {
        return;
    }
    if let Some(frame) = highlight.lock().expect("highlight poisoned").as_ref() {
        tracing::trace!(
            "Highlight at {},{} frame {}",
            frame.position.x,
            frame.position.y,
            frame.index
        );
        if let Some((at, label)) = &frame.label {
            tracing::trace!("Label {:?} at {},{}", label.text, at.x, at.y);
        }
    }
    let slots = [
        ("background", &loaders.background_slot),
        ("thumbnail", &loaders.thumbnail_slot),
    ];
    for (region, slot) in slots {
        match slot.take_changed() {
            Some(Some(image)) => {
                tracing::debug!("Drawing {region} at {}x{}", image.width(), image.height());
            }
            Some(None) => tracing::debug!("Clearing {region}"),
            None => {}
        }
    }
}
