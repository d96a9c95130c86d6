use eframe::{App, CreationContext, Frame};
use egui::{CentralPanel, Context, Id, RichText, SidePanel, TopBottomPanel, Ui};
use nox_canvas::{
    crash_screen,
    events::{Event, FnSink},
    visible_center, Canvas, CanvasView, Interaction, MockHierarchy, PaletteItem,
    SettingsNavigation, SettingsStyle, Supervisor,
};

use crate::structure::StructuralView;

pub struct StudioApp {
    canvas: Supervisor<Canvas>,
    structural: StructuralView,

    settings_style: SettingsStyle,
    settings_navigation: SettingsNavigation,
}

impl StudioApp {
    pub fn new(_: &CreationContext<'_>) -> Self {
        Self {
            canvas: Supervisor::new(|| {
                Canvas::new(MockHierarchy::default().build())
                    .with_event_sink(FnSink(|event: Event| log::trace!("{event:?}")))
            }),
            structural: StructuralView::default(),
            settings_style: SettingsStyle::default(),
            settings_navigation: SettingsNavigation::default(),
        }
    }
}

impl App for StudioApp {
    fn update(&mut self, ctx: &Context, _: &mut Frame) {
        if let Some(report) = self.canvas.crash_report().cloned() {
            CentralPanel::default().show(ctx, |ui| {
                if crash_screen(ui, &report) {
                    self.canvas.reload();
                }
            });
            return;
        }

        let style = &self.settings_style;
        let navigation = &self.settings_navigation;
        let structural = &mut self.structural;
        self.canvas.run(|canvas| {
            TopBottomPanel::top("breadcrumbs").show(ctx, |ui| breadcrumbs(ui, canvas));
            SidePanel::left("toolbox")
                .resizable(false)
                .show(ctx, toolbox);
            CentralPanel::default().show(ctx, |ui| {
                toolbar(ui, canvas, structural);
                ui.add(
                    &mut CanvasView::new(canvas)
                        .with_styles(style)
                        .with_navigations(navigation),
                );
            });
        });
        self.structural.show(ctx);
    }
}

fn breadcrumbs(ui: &mut Ui, canvas: &mut Canvas) {
    let last = canvas.path().len() - 1;
    let mut clicked = None;
    ui.horizontal(|ui| {
        for (i, crumb) in canvas.path().iter().enumerate() {
            if i > 0 {
                ui.label(RichText::new("/").weak());
            }
            if i == last {
                ui.label(RichText::new(&crumb.label).strong());
            } else if ui.link(&crumb.label).clicked() {
                clicked = Some(i);
            }
        }
    });
    if let Some(index) = clicked {
        canvas.dispatch(Interaction::BreadcrumbClicked(index));
    }
}

fn toolbox(ui: &mut Ui) {
    ui.heading("Toolbox");
    ui.label(RichText::new("Drag onto the canvas").small().weak());
    ui.add_space(8.);

    for item in PaletteItem::ALL {
        ui.dnd_drag_source(Id::new(("palette", item.key())), item.key().to_string(), |ui| {
            ui.group(|ui| {
                ui.label(RichText::new(item.title()).strong());
                ui.label(RichText::new(item.subtitle()).small().weak());
            });
        });
        ui.add_space(4.);
    }
}

fn toolbar(ui: &mut Ui, canvas: &mut Canvas, structural: &mut StructuralView) {
    ui.horizontal(|ui| {
        if ui.button("Router").clicked() {
            let at = visible_center(ui, None);
            canvas.dispatch(Interaction::AddRouter(at));
        }

        let armed = canvas.is_connect_armed();
        let label = if armed { "CONNECTING (ON)" } else { "Connect" };
        if ui.selectable_label(armed, label).clicked() {
            canvas.dispatch(Interaction::ToggleConnect);
        }

        ui.separator();
        let open = structural.is_open();
        let label = if open { "Close S-View" } else { "Structural View" };
        if ui.selectable_label(open, label).clicked() {
            structural.toggle();
        }
    });
}
