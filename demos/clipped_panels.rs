// MIT/Apache2 License

use easel::{ClipScene, LayoutConstants, Pixmap};
use std::fs;

fn main() -> easel::Result {
    env_logger::init();

    let mut scene = ClipScene::new(LayoutConstants::default())?;
    let size = scene.device_size();
    let mut pixmap = Pixmap::new(size.width.ceil() as u32, size.height.ceil() as u32);

    scene.render(&mut pixmap)?;

    let path = "clipped_panels.ppm";
    fs::write(path, to_ppm(pixmap))?;
    println!("wrote {}", path);
    Ok(())
}

/// Encode the pixmap as a binary PPM, dropping the alpha channel.
fn to_ppm(pixmap: Pixmap) -> Vec<u8> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let mut out = format!("P6\n{} {}\n255\n", width, height).into_bytes();
    for rgba in pixmap.into_rgba().chunks(4) {
        out.extend_from_slice(&rgba[..3]);
    }
    out
}
