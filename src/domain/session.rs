//! Selector state for one viewer, wired to the gate and report builder.
//!
//! A [`Session`] receives [`SelectionEvent`]s from the UI, recomputes what
//! depends on the changed selector and publishes [`Update`]s to subscribers:
//! a report-type change refreshes the year selector and the output region, a
//! year change refreshes the output region only.

use super::dataset::Dataset;
use super::gate::year_selector_disabled;
use super::report::{build_report, BuildOptions, Report, ReportType, Selection};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    ReportType(ReportType),
    Year(Option<i32>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    YearSelector { disabled: bool },
    Output(Report),
}

type Subscriber = Box<dyn FnMut(&Update)>;

pub struct Session {
    data: Arc<Dataset>,
    options: BuildOptions,
    selection: Selection,
    subscribers: Vec<Subscriber>,
}

impl Session {
    pub fn new(data: Arc<Dataset>, options: BuildOptions) -> Self {
        Session {
            data,
            options,
            selection: Selection::default(),
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&Update) + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn dispatch(&mut self, event: SelectionEvent) {
        match event {
            SelectionEvent::ReportType(report_type) => {
                self.selection.report_type = report_type;
                self.publish(Update::YearSelector {
                    disabled: year_selector_disabled(report_type),
                });
            }
            SelectionEvent::Year(year) => self.selection.year = year,
        }
        self.publish_output();
    }

    /// Publish the state for the current selection, as on first render.
    pub fn refresh(&mut self) {
        self.publish(Update::YearSelector {
            disabled: year_selector_disabled(self.selection.report_type),
        });
        self.publish_output();
    }

    fn publish_output(&mut self) {
        let report = build_report(&self.data, &self.selection, &self.options);
        log::debug!(
            "{:?} -> {} charts",
            self.selection,
            report.chart_count()
        );
        self.publish(Update::Output(report));
    }

    fn publish(&mut self, update: Update) {
        for subscriber in &mut self.subscribers {
            subscriber(&update);
        }
    }
}
