use std::{
    any::Any,
    panic::{catch_unwind, AssertUnwindSafe},
};

use egui::{Align, Color32, Layout, RichText, Ui};
use instant::Instant;

/// Failure captured by a [`Supervisor`].
#[derive(Debug, Clone)]
pub struct CrashReport {
    pub message: String,
    pub at: Instant,
}

enum Health<T> {
    Healthy(T),
    Crashed(CrashReport),
}

/// Owns a value built by a factory and replaces it with a crash report when
/// code running against it panics. [`Supervisor::reload`] builds a fresh value.
pub struct Supervisor<T> {
    factory: Box<dyn Fn() -> T>,
    state: Health<T>,
}

impl<T> Supervisor<T> {
    pub fn new(factory: impl Fn() -> T + 'static) -> Self {
        let state = Health::Healthy(factory());
        Self {
            factory: Box::new(factory),
            state,
        }
    }

    /// Runs `f` against the supervised value. A panic is captured, the value
    /// is dropped and `None` is returned. Also returns `None` while crashed.
    pub fn run<O>(&mut self, f: impl FnOnce(&mut T) -> O) -> Option<O> {
        let Health::Healthy(value) = &mut self.state else {
            return None;
        };

        match catch_unwind(AssertUnwindSafe(|| f(value))) {
            Ok(out) => Some(out),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                log::error!("canvas crashed: {message}");
                self.state = Health::Crashed(CrashReport {
                    message,
                    at: Instant::now(),
                });
                None
            }
        }
    }

    pub fn is_crashed(&self) -> bool {
        matches!(self.state, Health::Crashed(_))
    }

    pub fn crash_report(&self) -> Option<&CrashReport> {
        match &self.state {
            Health::Crashed(report) => Some(report),
            Health::Healthy(_) => None,
        }
    }

    pub fn get(&self) -> Option<&T> {
        match &self.state {
            Health::Healthy(value) => Some(value),
            Health::Crashed(_) => None,
        }
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        match &mut self.state {
            Health::Healthy(value) => Some(value),
            Health::Crashed(_) => None,
        }
    }

    /// Drops the current value, crashed or not, and builds a fresh one.
    pub fn reload(&mut self) {
        log::info!("reloading supervised state");
        self.state = Health::Healthy((self.factory)());
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Fallback screen shown in place of a crashed canvas. Returns `true` when
/// the reboot button was clicked.
pub fn crash_screen(ui: &mut Ui, report: &CrashReport) -> bool {
    let mut reboot = false;
    ui.with_layout(Layout::top_down(Align::Center), |ui| {
        ui.add_space(ui.available_height() / 3.);
        ui.label(
            RichText::new("System Malfunction")
                .heading()
                .color(Color32::from_rgb(0xef, 0x44, 0x44)),
        );
        ui.add_space(8.);
        ui.label(RichText::new(&report.message).monospace().weak());
        ui.label(
            RichText::new(format!("{:.1}s ago", report.at.elapsed().as_secs_f32()))
                .small()
                .weak(),
        );
        ui.add_space(16.);
        reboot = ui.button("Reboot Interface").clicked();
    });
    reboot
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;

    #[test]
    fn captures_panic_and_reloads() {
        let builds = Rc::new(Cell::new(0));
        let counter = Rc::clone(&builds);
        let mut sup = Supervisor::new(move || {
            counter.set(counter.get() + 1);
            vec![1, 2, 3]
        });

        assert_eq!(sup.run(|v| v.len()), Some(3));

        let out: Option<()> = sup.run(|_| panic!("boom"));
        assert_eq!(out, None);
        assert!(sup.is_crashed());
        assert_eq!(sup.crash_report().unwrap().message, "boom");
        assert!(sup.get().is_none());
        assert_eq!(sup.run(|v| v.len()), None);

        sup.reload();
        assert!(!sup.is_crashed());
        assert_eq!(sup.get(), Some(&vec![1, 2, 3]));
        assert_eq!(builds.get(), 2);
    }

    #[test]
    fn formatted_panic_message() {
        let mut sup = Supervisor::new(|| 0_u8);
        sup.run(|v| panic!("bad value {v}"));
        assert_eq!(sup.crash_report().unwrap().message, "bad value 0");
    }
}
