use super::*;

fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> kurbo::BezPath {
    polygon(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
}

#[test]
fn layer_rejects_empty_and_oversized_sizes() {
    assert!(Layer::new(0, 4).is_err());
    assert!(Layer::new(70_000, 4).is_err());
}

#[test]
fn filled_path_covers_its_interior_only() {
    let mut layer = Layer::new(10, 10).unwrap();
    layer.fill_path(&square(2.0, 2.0, 8.0, 8.0), Rgba8::rgb(255, 0, 0));
    let out = layer.finish().unwrap();
    assert_eq!(out.pixel(5, 5), Some([255, 0, 0, 255]));
    assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 0]));
}

#[test]
fn fill_with_paint_samples_the_paint_surface() {
    let mut paint = Surface::new(10, 10).unwrap();
    paint.fill(Rgba8::rgb(0, 255, 0));
    let mut layer = Layer::new(10, 10).unwrap();
    layer.fill_path_with(&square(0.0, 0.0, 10.0, 5.0), &paint);
    let out = layer.finish().unwrap();
    let px = out.pixel(4, 2).unwrap();
    assert!(px[1] >= 250 && px[3] >= 250);
    assert_eq!(out.pixel(4, 8), Some([0, 0, 0, 0]));
}

#[test]
fn draw_image_scales_into_target_rect() {
    let mut img = Surface::new(2, 2).unwrap();
    img.fill(Rgba8::rgb(0, 0, 255));
    let mut layer = Layer::new(12, 12).unwrap();
    layer.draw_image(&img, 2.0, 2.0, 8.0, 8.0);
    let out = layer.finish().unwrap();
    let px = out.pixel(6, 6).unwrap();
    assert!(px[2] >= 250 && px[3] >= 250);
    assert_eq!(out.pixel(11, 11), Some([0, 0, 0, 0]));
}

#[test]
fn shadow_darkens_around_the_shape() {
    let mut layer = Layer::new(20, 20).unwrap();
    layer.fill_path(&square(6.0, 6.0, 14.0, 14.0), Rgba8::WHITE);
    let layer = layer.finish().unwrap();

    let mut plain = Surface::new(20, 20).unwrap();
    composite_with_shadow(&mut plain, &layer, 0.0, Rgba8::BLACK).unwrap();
    assert_eq!(plain.pixel(4, 10), Some([0, 0, 0, 0]));

    let mut shadowed = Surface::new(20, 20).unwrap();
    composite_with_shadow(&mut shadowed, &layer, 4.0, Rgba8::BLACK).unwrap();
    let halo = shadowed.pixel(4, 10).unwrap();
    assert!(halo[3] > 0);
    assert_eq!(&halo[..3], &[0, 0, 0]);
    assert_eq!(shadowed.pixel(10, 10), Some([255, 255, 255, 255]));
}
