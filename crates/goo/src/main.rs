use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use goo_config::Config;
use goo_render::{RenderOptions, Scene, project, view};
use goo_sim::{FrameLoop, SimParams, Simulation};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Stylize},
    text::{Line, Span},
};
use tracing::{info, warn};

mod export;
mod logging;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let log_path = logging::init()?;
    let terminal = ratatui::init();
    let result = App::new(log_path.is_some()).run(terminal);
    ratatui::restore();
    result
}

/// Accent color for key hints.
const ACCENT: Color = Color::Cyan;

/// Simulation parameters for the configured variant and overrides.
fn sim_params(config: &Config) -> SimParams {
    SimParams::for_variant(config.variant).with_motion(config.speed, config.decay)
}

/// Render options for the configured variant and mask override.
fn render_options(config: &Config) -> RenderOptions {
    RenderOptions {
        mask: config.mask_enabled(),
        ..RenderOptions::for_variant(config.variant)
    }
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Is the simulation paused?
    paused: bool,
    /// Loaded configuration.
    config: Config,
    /// Whether changes are written back to the config file.
    persist: bool,
    /// The particle store.
    sim: Simulation,
    /// Spawn and update subscriptions.
    frames: FrameLoop<Simulation>,
    /// Clock origin of the animation.
    started: Instant,
    /// Scene of the last drawn frame, kept for export.
    last_scene: Scene,
    /// Area the last scene was drawn into.
    last_area: Rect,
    /// Transient message shown in the status line.
    status: Option<String>,
}

impl App {
    /// Construct a new instance of [`App`], loading the user config.
    pub fn new(logging: bool) -> Self {
        let (config, persist, status) = match Config::load() {
            Ok(config) => (config, true, None),
            Err(e) => {
                warn!(error = %e, "falling back to default config");
                // Don't overwrite a file the user has to fix by hand.
                (Config::default(), false, Some(e.to_string()))
            }
        };

        let params = sim_params(&config);
        let sim = match config.seed {
            Some(seed) => Simulation::new(params, seed),
            None => Simulation::with_entropy(params),
        };
        info!(variant = %config.variant, logging, "starting");

        Self {
            running: false,
            paused: false,
            config,
            persist,
            sim,
            frames: FrameLoop::new(),
            started: Instant::now(),
            last_scene: Scene::default(),
            last_area: Rect::default(),
            status,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        self.start_loop();
        while self.running {
            let now_ms = self.now_ms();
            self.frames.frame(&mut self.sim, now_ms);
            terminal.draw(|frame| self.render(frame, now_ms))?;
            self.handle_crossterm_events()?;
        }
        self.frames.stop();
        info!(particles = self.sim.len(), "exiting");
        Ok(())
    }

    /// Milliseconds since the animation started.
    fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Subscribe spawning, then updating, to the frame loop.
    fn start_loop(&mut self) {
        let now_ms = self.now_ms();
        self.frames.subscribe(
            |sim: &mut Simulation, tick| {
                sim.spawn(tick.now_ms);
            },
            now_ms,
        );
        self.frames.subscribe(
            |sim: &mut Simulation, tick| sim.advance(tick.elapsed_ms, tick.now_ms),
            now_ms,
        );
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame, now_ms: f64) {
        let chunks = Layout::vertical([
            Constraint::Fill(1),   // Animation
            Constraint::Length(1), // Help and status
        ])
        .split(frame.area());

        let scene = project(self.sim.snapshot(), now_ms, &render_options(&self.config));
        view::render_scene(frame, chunks[0], &scene, self.config.background_color());
        self.last_scene = scene;
        self.last_area = chunks[0];

        let mut spans: Vec<Span> = vec![
            "q".bold().fg(ACCENT),
            " quit  ".dark_gray(),
            "space".bold().fg(ACCENT),
            (if self.paused { " resume  " } else { " pause  " }).dark_gray(),
            "v".bold().fg(ACCENT),
            " variant  ".dark_gray(),
            "m".bold().fg(ACCENT),
            " mask  ".dark_gray(),
            "r".bold().fg(ACCENT),
            " reset  ".dark_gray(),
            "s".bold().fg(ACCENT),
            " save svg   ".dark_gray(),
        ];
        match &self.status {
            Some(message) => spans.push(message.clone().yellow()),
            None => spans.push(
                format!("{} · {} blobs", self.config.variant, self.sim.len()).fg(ACCENT),
            ),
        }
        frame.render_widget(Line::from(spans).centered(), chunks[1]);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Polls with the frame interval as timeout so the animation keeps moving.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(Duration::from_millis(self.config.frame_interval_ms))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(_) => {}
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char(' ')) => self.toggle_pause(),
            (_, KeyCode::Char('v')) => self.cycle_variant(),
            (_, KeyCode::Char('m')) => self.toggle_mask(),
            (_, KeyCode::Char('r')) => self.reset(),
            (_, KeyCode::Char('s')) => self.export_frame(),
            _ => {}
        }
    }

    /// Stop or restart both frame subscriptions.
    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        if self.paused {
            self.frames.stop();
        } else {
            self.start_loop();
        }
        self.status = None;
    }

    /// Switch to the next variant and persist the choice.
    fn cycle_variant(&mut self) {
        self.config.cycle_variant();
        self.sim.set_params(sim_params(&self.config));
        info!(variant = %self.config.variant, "variant changed");
        self.save_config();
    }

    /// Flip the mask and persist the override.
    fn toggle_mask(&mut self) {
        self.config.toggle_mask();
        self.save_config();
    }

    /// Drop every particle.
    fn reset(&mut self) {
        self.sim.clear();
        self.status = None;
    }

    /// Write the last drawn scene to an SVG file.
    fn export_frame(&mut self) {
        let height = export::export_height(self.last_area.width, self.last_area.height);
        let result = export::write_svg(
            &export::export_dir(),
            &self.last_scene,
            height,
            self.config.background_color(),
        );
        self.status = Some(match result {
            Ok(path) => {
                info!(path = %path.display(), "exported frame");
                format!("saved {}", path.display())
            }
            Err(e) => {
                warn!(error = %e, "export failed");
                format!("export failed: {e}")
            }
        });
    }

    fn save_config(&mut self) {
        self.status = None;
        if !self.persist {
            return;
        }
        if let Err(e) = self.config.save() {
            warn!(error = %e, "failed to save config");
            self.status = Some(e.to_string());
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goo_core::Variant;

    #[test]
    fn test_render_options_honor_mask_override() {
        let config = Config {
            variant: Variant::Drift,
            show_mask: Some(true),
            ..Config::default()
        };
        assert!(render_options(&config).mask);

        let config = Config {
            show_mask: None,
            ..config
        };
        assert!(!render_options(&config).mask);
    }

    #[test]
    fn test_sim_params_apply_overrides() {
        let config = Config {
            decay: Some(0.001),
            ..Config::default()
        };
        let params = sim_params(&config);
        assert_eq!(params.motion.decay, 0.001);
        assert_eq!(params, SimParams::for_variant(config.variant).with_motion(None, Some(0.001)));
    }
}
