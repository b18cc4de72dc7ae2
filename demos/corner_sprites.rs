//=========================================================================
// Corner Sprites Demo
//
// Four 100×100 squares pinned to the corners of a 1280×720 virtual
// canvas. Resize the window or press F11 to see the letterbox keep
// them in place; Escape (or gamepad Back) quits.
//
// There is no GPU backend in this crate, so the renderer here only logs
// what it would draw. Run with `RUST_LOG=debug` to see every frame.
//
//=========================================================================

use letterbox_engine::prelude::*;
use log::{debug, info};

//=== Corner ==============================================================

/// Solid square built from the built-in pixel texture.
struct Corner;

impl Behavior for Corner {
    fn load_content(
        &mut self,
        entity: &mut Entity,
        content: &mut dyn ContentLoader,
    ) -> Result<(), ContentError> {
        let pixel = content.load_texture(ContentLibrary::PIXEL)?;
        entity.set_visual(Sprite::new(pixel));
        entity.set_scale(Vec2::splat(100.0));
        Ok(())
    }
}

//=== LoggingRenderer =====================================================

#[derive(Default)]
struct LoggingRenderer {
    frame: u64,
    draws: usize,
}

impl RenderBackend for LoggingRenderer {
    fn set_viewport(&mut self, viewport: Viewport) {
        if self.frame == 0 {
            info!("Viewport {:?}", viewport);
        }
    }

    fn clear(&mut self, _color: Color) {}

    fn begin_batch(&mut self, _transform: Mat4) {
        self.draws = 0;
    }

    fn draw(&mut self, command: &DrawCommand) {
        self.draws += 1;
        if self.frame == 0 {
            info!("Draw {:?} at {}", command.texture, command.position);
        }
    }

    fn end_batch(&mut self) {
        debug!("Frame {}: {} draws", self.frame, self.draws);
        self.frame += 1;
    }
}

//=== Main ================================================================

fn main() -> Result<(), EngineError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    EngineBuilder::new()
        .with_title("Corner Sprites")
        .with_virtual_resolution(1280, 720)
        .build()?
        .init(|systems, context| {
            let size = context.viewport.virtual_size();
            let corners = [
                Vec2::new(25.0, 25.0),
                Vec2::new(25.0, size.y - 25.0),
                Vec2::new(size.x - 25.0, 25.0),
                Vec2::new(size.x - 25.0, size.y - 25.0),
            ];

            for corner in corners {
                systems.entities.instantiate(Entity::new().at(corner), Corner)?;
            }
            Ok(())
        })?
        .run(LoggingRenderer::default())
}
