use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::theme::{self, ThemeColors};
use crate::gui::wheel::{self, FrameClockScheduler, State};
use crate::sys::navigate;
use arcwheel::portfolio::Portfolio;
use arcwheel::{CoastTicket, Point, PointerTracker, Release};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

pub struct AppModel {
    pub state: Rc<RefCell<State<FrameClockScheduler>>>,
    pub visible: bool,
    pub config: Config,
    pub portfolio_path: Option<PathBuf>,
    /// `--portfolio` override; wins over the settings file on every reload.
    pub cli_portfolio: Option<PathBuf>,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Show,
    Hide,
    Reload,
    ConfigReload,
    PortfolioReload,
    Resize(i32, i32),
    PointerDown(Point, Duration),
    PointerMove(Point, Duration),
    PointerUp(Point, Duration),
    PointerCancel(Duration),
    Tick(CoastTicket),
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Show => AppMsg::Show,
            AppEvent::Hide => AppMsg::Hide,
            AppEvent::Reload => AppMsg::Reload,
            AppEvent::ConfigReload => AppMsg::ConfigReload,
            AppEvent::PortfolioReload => AppMsg::PortfolioReload,
        }
    }
}

pub struct AppInit {
    pub config: Config,
    pub portfolio: Portfolio,
    pub portfolio_path: Option<PathBuf>,
    pub cli_portfolio: Option<PathBuf>,
    pub rx: async_channel::Receiver<AppEvent>,
}

/// Timestamp of the event the controller is handling, on the windowing system's clock.
fn event_time(controller: &impl IsA<gtk::EventController>) -> Duration {
    Duration::from_millis(u64::from(controller.current_event_time()))
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Orbit"),
            #[watch]
            set_default_size: (model.config.wheel.size as i32, model.config.wheel.size as i32),
            #[watch]
            set_visible: model.visible,
            add_css_class: "orbit-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Hide);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "orbit-drawing-area",

                connect_resize[sender] => move |_, width, height| {
                    sender.input(AppMsg::Resize(width, height));
                },

                add_controller = gtk::GestureDrag {
                    connect_drag_begin[sender] => move |gesture, x, y| {
                        sender.input(AppMsg::PointerDown(Point::new(x, y), event_time(gesture)));
                    },
                    connect_drag_update[sender] => move |gesture, dx, dy| {
                        if let Some((x, y)) = gesture.start_point() {
                            let pos = Point::new(x + dx, y + dy);
                            sender.input(AppMsg::PointerMove(pos, event_time(gesture)));
                        }
                    },
                    connect_drag_end[sender] => move |gesture, dx, dy| {
                        if let Some((x, y)) = gesture.start_point() {
                            let pos = Point::new(x + dx, y + dy);
                            sender.input(AppMsg::PointerUp(pos, event_time(gesture)));
                        }
                    },
                    connect_cancel[sender] => move |gesture, _| {
                        sender.input(AppMsg::PointerCancel(event_time(gesture)));
                    },
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let AppInit {
            config,
            portfolio,
            portfolio_path,
            cli_portfolio,
            rx,
        } = init;

        theme::load_css();

        let scheduler = FrameClockScheduler::new(&root, sender.input_sender().clone());
        let state = Rc::new(RefCell::new(State::new(portfolio, &config, scheduler)));

        let model = AppModel {
            state: state.clone(),
            visible: false,
            config,
            portfolio_path,
            cli_portfolio,
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let state_draw = model.state.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                let state = state_draw.borrow();
                if let Err(e) = wheel::draw(cr, &state.wheel.scene(), &state.caption(), &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        root.set_visible(false);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Show => {
                self.visible = true;
                self.drawing_area.queue_draw();
            }
            AppMsg::Hide => {
                self.visible = false;
                self.state.borrow_mut().wheel.controller_mut().stop();
            }
            AppMsg::Reload => {
                self.reload_config();
                self.reload_portfolio();
            }
            AppMsg::ConfigReload => self.reload_config(),
            AppMsg::PortfolioReload => self.reload_portfolio(),
            AppMsg::Resize(width, height) => {
                self.state
                    .borrow_mut()
                    .wheel
                    .measure(f64::from(width), f64::from(height));
                self.drawing_area.queue_draw();
            }
            AppMsg::PointerDown(pos, time) => {
                self.state.borrow_mut().wheel.on_start(pos, time);
                self.drawing_area.queue_draw();
            }
            AppMsg::PointerMove(pos, time) => {
                self.state.borrow_mut().wheel.on_move(pos, time);
                self.drawing_area.queue_draw();
            }
            AppMsg::PointerUp(pos, time) => {
                let release = self.state.borrow_mut().wheel.on_end(pos, time);
                self.handle_release(&release);
                self.drawing_area.queue_draw();
            }
            AppMsg::PointerCancel(time) => {
                // a cancelled gesture never navigates
                let release = self.state.borrow_mut().wheel.cancel(time);
                log::debug!("Gesture cancelled: {:?}", release);
                self.drawing_area.queue_draw();
            }
            AppMsg::Tick(ticket) => {
                self.state.borrow_mut().wheel.tick(ticket);
                self.drawing_area.queue_draw();
            }
        }
    }
}

impl AppModel {
    fn handle_release(&self, release: &Release) {
        let property = self.state.borrow().selection(release).cloned();
        let Some(property) = property else {
            return;
        };

        log::info!("Opening property '{}' ({})", property.title, property.id);
        if let Err(e) = navigate::open_property(&self.config.open_command, &property.id) {
            log::error!("Failed to open property '{}': {}", property.title, e);
        }
    }

    fn reload_config(&mut self) {
        match config::load_config() {
            Ok(new_config) => {
                self.state.borrow_mut().apply_config(&new_config);
                let moved = config::moved_portfolio_path(
                    self.portfolio_path.as_deref(),
                    self.cli_portfolio.as_deref(),
                    &new_config,
                );
                self.config = new_config;
                self.drawing_area.queue_draw();
                log::info!("Configuration reloaded");

                if let Some(path) = moved {
                    log::info!("Portfolio moved to {}", path.display());
                    self.portfolio_path = Some(path);
                    self.reload_portfolio();
                }
            }
            Err(e) => log::error!("Failed to reload config: {}", e),
        }
    }

    fn reload_portfolio(&mut self) {
        let Some(path) = &self.portfolio_path else {
            log::warn!("No portfolio file to reload");
            return;
        };
        match config::load_portfolio(path) {
            Ok(portfolio) => {
                self.state.borrow_mut().set_portfolio(portfolio);
                self.drawing_area.queue_draw();
            }
            Err(e) => log::error!("Failed to reload portfolio: {}", e),
        }
    }
}
