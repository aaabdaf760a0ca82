use std::fmt::Write;
use std::path::Path;

use tileview_lib::{PreviewScene, Settings, load_catalog};
use rendering::instance::{Instance, Material};

pub struct TestScene {
    pub scene: PreviewScene,
}

impl TestScene {
    pub fn new(addons: u32) -> Self {
        Self::with_settings(|settings| settings.preview.addons = addons)
    }

    pub fn with_settings(configure: impl FnOnce(&mut Settings)) -> Self {
        let mut settings = Settings::default();
        configure(&mut settings);

        let storage =
            load_catalog(Path::new("assets/catalog.toml")).expect("Failed to load sample catalog");
        let scene = PreviewScene::new(&settings, &storage).expect("Failed to build preview scene");
        Self { scene }
    }

    /// Runs `frames` frames and tabulates what each one produced.
    pub fn run(&mut self, frames: u32) -> String {
        let mut table = String::new();
        for _ in 0..frames {
            let stats = self.scene.frame();
            writeln!(
                table,
                "tick {:>3} phase {} instances {} calls {} marks {} loaded {}",
                stats.ticks, stats.phase, stats.instances, stats.draw_calls, stats.marks, stats.loaded
            )
            .unwrap();
        }
        table
    }

    /// One line per instance of the last frame, in submission order.
    pub fn describe_batch(&self) -> String {
        let mut out = String::new();
        for instance in self.scene.batch().instances() {
            writeln!(out, "{}", describe(instance)).unwrap();
        }
        out
    }
}

fn describe(instance: &Instance) -> String {
    let mut line = format!(
        "tex {} {} at {},{} size {}x{}",
        instance.texture.0,
        match instance.material {
            Material::Sprite => "sprite",
            Material::Outfit(_) => "outfit",
            Material::Marks => "marks",
        },
        instance.position.x,
        instance.position.y,
        instance.size.x,
        instance.size.y,
    );
    if instance.material == Material::Marks {
        let frame = instance.tex_max - instance.tex_min;
        let column = (instance.tex_min.x / frame.x).round();
        let row = (instance.tex_min.y / frame.y).round();
        let color = instance.color;
        write!(
            line,
            " frame {},{} color {},{},{}",
            column, row, color.r, color.g, color.b
        )
        .unwrap();
    }
    line
}
