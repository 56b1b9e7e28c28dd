use crate::config::Config;
use crate::gui::app::AppMsg;
use arcwheel::portfolio::{Portfolio, Property};
use arcwheel::{CoastTicket, FrameScheduler, Release, Wheel};
use gtk::prelude::*;
use gtk4 as gtk;

/// Requests coasting frames from the widget's frame clock; each frame comes back to the
/// component as [`AppMsg::Tick`].
pub struct FrameClockScheduler {
    widget: gtk::Widget,
    input: relm4::Sender<AppMsg>,
}

impl FrameClockScheduler {
    pub fn new(widget: &impl IsA<gtk::Widget>, input: relm4::Sender<AppMsg>) -> Self {
        Self {
            widget: widget.clone().upcast(),
            input,
        }
    }
}

impl FrameScheduler for FrameClockScheduler {
    fn request_tick(&mut self, ticket: CoastTicket) {
        let input = self.input.clone();
        self.widget.add_tick_callback(move |_, _| {
            input.emit(AppMsg::Tick(ticket));
            glib::ControlFlow::Break
        });
    }
}

/// Text shown in the middle of the wheel.
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub title: String,
    pub value: String,
    pub detail: Option<String>,
}

pub struct State<S> {
    pub wheel: Wheel<S>,
    pub portfolio: Portfolio,
}

impl<S: FrameScheduler> State<S> {
    pub fn new(portfolio: Portfolio, config: &Config, scheduler: S) -> Self {
        let wheel = Wheel::new(
            portfolio.allocation_items(),
            config.layout,
            config.rotation_params(),
            config.wheel,
            scheduler,
        );
        Self { wheel, portfolio }
    }

    pub fn set_portfolio(&mut self, portfolio: Portfolio) {
        self.wheel.set_items(portfolio.allocation_items());
        self.portfolio = portfolio;
    }

    /// Applies new settings. The rotation is kept, shifted by any change of start edge.
    pub fn apply_config(&mut self, config: &Config) {
        self.wheel.set_layout_params(config.layout);
        self.wheel.set_rotation_params(config.rotation_params());
        self.wheel.set_sizing(config.wheel);
    }

    /// The property a finished gesture selected, if it was a tap on a segment.
    pub fn selection(&self, release: &Release) -> Option<&Property> {
        match release {
            Release::Tap(Some(id)) => {
                let property = self.portfolio.property_for(id);
                if property.is_none() {
                    log::warn!("Tapped segment {} has no property", id);
                }
                property
            }
            _ => None,
        }
    }

    pub fn caption(&self) -> Caption {
        Caption {
            title: "Total value".to_string(),
            value: format_amount(self.portfolio.total_value()),
            detail: self
                .portfolio
                .gain_percent()
                .map(|gain| format!("{:+.1}%", gain)),
        }
    }
}

/// Whole-unit amount with thousands separators, e.g. `12,500`.
pub fn format_amount(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
