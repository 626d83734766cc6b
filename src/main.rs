//! Desktop viewer binary for swivel panorama camera navigation.

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use glam::DVec2;
use rustc_hash::FxHashMap;
use swivel::camera::{Position, Viewport};
use swivel::input::{InputEvent, KeyAction, ViewerEvent};
use swivel::options::Options;
use swivel::util::timer::SystemClock;
use swivel::{AnimateOptions, Navigator};
use web_time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, Touch, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::Key,
    window::{Fullscreen, Window, WindowId},
};

/// Pixels per wheel line on hosts that report line deltas.
const LINE_HEIGHT: f64 = 40.0;

struct PanoramaApp {
    window: Option<Arc<Window>>,
    navigator: Option<Navigator>,
    options: Options,
    position: Rc<Cell<Position>>,
    zoom: Rc<Cell<f64>>,
    cursor: DVec2,
    ctrl: bool,
    touches: FxHashMap<u64, DVec2>,
    last_frame_time: Instant,
}

impl PanoramaApp {
    fn new(options: Options) -> Self {
        Self {
            window: None,
            navigator: None,
            options,
            position: Rc::new(Cell::new(Position::default())),
            zoom: Rc::new(Cell::new(0.0)),
            cursor: DVec2::ZERO,
            ctrl: false,
            touches: FxHashMap::default(),
            last_frame_time: Instant::now(),
        }
    }

    fn viewport(window: &Window) -> Viewport {
        let size = window.inner_size();
        let ratio = window.scale_factor();
        Viewport {
            width: f64::from(size.width) / ratio,
            height: f64::from(size.height) / ratio,
            pixel_ratio: ratio,
        }
    }

    fn feed(&mut self, input: InputEvent) {
        let Some(navigator) = &mut self.navigator else {
            return;
        };
        let events = navigator.handle_input(input);
        self.dispatch(events);
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn dispatch(&mut self, events: Vec<ViewerEvent>) {
        for event in events {
            match event {
                ViewerEvent::Click(data) => {
                    log::info!("click at ({}, {}) right={}", data.x, data.y, data.rightclick);
                }
                ViewerEvent::DoubleClick(data) => {
                    log::info!("double click at ({}, {})", data.x, data.y);
                }
                ViewerEvent::ShowHint(hint) => log::info!("hint: {hint:?}"),
                ViewerEvent::HideHint(hint) => log::info!("hint hidden: {hint:?}"),
                ViewerEvent::KeyCommand(name) => self.run_command(&name),
            }
        }
    }

    fn run_command(&mut self, name: &str) {
        match name {
            "reset" => {
                let Some(navigator) = &mut self.navigator else {
                    return;
                };
                let camera = &self.options.camera;
                if let Err(e) = navigator.animate(AnimateOptions {
                    yaw: Some(camera.default_yaw.to_radians()),
                    pitch: Some(camera.default_pitch.to_radians()),
                    zoom: Some(camera.default_zoom_level),
                    fov: None,
                    speed: None,
                }) {
                    log::error!("reset failed: {e}");
                }
            }
            other => log::warn!("unknown command {other:?}"),
        }
    }

    fn toggle_fullscreen(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let entering = window.fullscreen().is_none();
        window.set_fullscreen(entering.then_some(Fullscreen::Borderless(None)));
        self.feed(InputEvent::FullscreenChanged(entering));
    }

    fn touch(&mut self, touch: Touch) {
        let ratio = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
        let point = DVec2::new(touch.location.x, touch.location.y) / ratio;
        let input = match touch.phase {
            TouchPhase::Started => {
                let _ = self.touches.insert(touch.id, point);
                InputEvent::TouchStart {
                    touches: self.active_touches(),
                }
            }
            TouchPhase::Moved => {
                let _ = self.touches.insert(touch.id, point);
                InputEvent::TouchMove {
                    touches: self.active_touches(),
                }
            }
            TouchPhase::Ended => {
                let _ = self.touches.remove(&touch.id);
                InputEvent::TouchEnd {
                    touches: self.active_touches(),
                    changed: vec![point],
                }
            }
            TouchPhase::Cancelled => {
                self.touches.clear();
                InputEvent::TouchCancel
            }
        };
        self.feed(input);
    }

    /// Active touch points ordered by id, so a pinch keeps its finger order.
    fn active_touches(&self) -> Vec<DVec2> {
        let mut touches: Vec<_> = self.touches.iter().collect();
        touches.sort_unstable_by_key(|(id, _)| **id);
        touches.into_iter().map(|(_, point)| *point).collect()
    }

    fn update_title(&self) {
        if let Some(window) = &self.window {
            let position = self.position.get();
            window.set_title(&format!(
                "swivel - yaw {:.1}° pitch {:.1}° zoom {:.0}",
                position.yaw.to_degrees(),
                position.pitch.to_degrees(),
                self.zoom.get()
            ));
        }
    }
}

/// Key name in the DOM `KeyboardEvent.key` form the bindings use.
fn key_name(key: &Key) -> Option<String> {
    match key {
        Key::Named(named) => Some(format!("{named:?}")),
        Key::Character(text) => Some(text.as_str().to_owned()),
        _ => None,
    }
}

impl ApplicationHandler for PanoramaApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = Window::default_attributes()
            .with_title("swivel")
            .with_inner_size(winit::dpi::LogicalSize::new(960.0, 540.0));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let position = Rc::clone(&self.position);
        let zoom = Rc::clone(&self.zoom);
        let mut navigator = match Navigator::new(
            &self.options,
            Rc::new(SystemClock::new()),
            move |pos| position.set(pos),
            move |level| zoom.set(level),
        ) {
            Ok(navigator) => navigator,
            Err(e) => {
                log::error!("invalid camera options: {e}");
                event_loop.exit();
                return;
            }
        };
        navigator.set_viewport(Self::viewport(&window));

        window.request_redraw();
        self.window = Some(window);
        self.navigator = Some(navigator);
        self.last_frame_time = Instant::now();
        self.update_title();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(navigator) = &mut self.navigator {
                    navigator.destroy();
                }
                event_loop.exit();
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                if let (Some(window), Some(navigator)) =
                    (&self.window, &mut self.navigator)
                {
                    navigator.set_viewport(Self::viewport(window));
                }
            }

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let elapsed = now.duration_since(self.last_frame_time);
                self.last_frame_time = now;
                let Some(navigator) = &mut self.navigator else {
                    return;
                };
                let frame = navigator.tick(elapsed);
                self.dispatch(frame.events);
                if frame.redraw {
                    self.update_title();
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                let (x, y) = (self.cursor.x, self.cursor.y);
                let button = button.into();
                self.feed(match state {
                    ElementState::Pressed => InputEvent::PointerDown { button, x, y },
                    ElementState::Released => InputEvent::PointerUp { button, x, y },
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                let ratio = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                self.cursor = DVec2::new(position.x, position.y) / ratio;
                self.feed(InputEvent::PointerMove {
                    x: self.cursor.x,
                    y: self.cursor.y,
                });
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -f64::from(y) * LINE_HEIGHT,
                    MouseScrollDelta::PixelDelta(pos) => -pos.y,
                };
                self.feed(InputEvent::Wheel {
                    delta_y,
                    ctrl: self.ctrl,
                });
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.ctrl = modifiers.state().control_key();
            }

            WindowEvent::Touch(touch) => self.touch(touch),

            WindowEvent::KeyboardInput { event, .. } => {
                let Some(key) = key_name(&event.logical_key) else {
                    return;
                };
                match event.state {
                    // fullscreen is what enables the keyboard by default, so
                    // the toggle bypasses the recognizer
                    ElementState::Pressed if key == "F11" => {
                        if !event.repeat {
                            self.toggle_fullscreen();
                        }
                    }
                    ElementState::Pressed if !event.repeat => {
                        self.feed(InputEvent::KeyDown { key });
                    }
                    ElementState::Released => self.feed(InputEvent::KeyUp { key }),
                    ElementState::Pressed => {}
                }
            }

            _ => (),
        }
    }
}

fn load_options() -> Options {
    let mut options = match std::env::args().nth(1) {
        Some(path) => Options::load(Path::new(&path)).unwrap_or_else(|e| {
            log::error!("{e}, using defaults");
            Options::default()
        }),
        None => Options::default(),
    };
    options
        .keybindings
        .bind("r", KeyAction::Command("reset".to_owned()));
    log::debug!("camera options: {:?}", options.camera);
    options
}

fn main() {
    env_logger::init();

    let mut app = PanoramaApp::new(load_options());
    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("failed to create event loop: {e}");
            std::process::exit(1);
        }
    };

    event_loop.set_control_flow(ControlFlow::Poll);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("event loop error: {e}");
        std::process::exit(1);
    }
}
