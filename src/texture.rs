use globe_core::{fit_extent, TextureImage};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Fetches and decodes an image, returning its pixels as RGBA8.
///
/// The browser decodes the file; the pixels are read back through a scratch
/// 2D canvas that is never attached to the page. Images larger than
/// `max_dim` on either edge are scaled down to fit while drawing.
pub async fn load_image(
    document: &web::Document,
    url: &str,
    max_dim: u32,
) -> anyhow::Result<TextureImage> {
    let img = web::HtmlImageElement::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    img.set_src(url);
    JsFuture::from(img.decode())
        .await
        .map_err(|e| anyhow::anyhow!("decode {url}: {:?}", e))?;
    let (natural_w, natural_h) = (img.natural_width(), img.natural_height());
    let (width, height) = fit_extent(natural_w, natural_h, max_dim);
    if (width, height) != (natural_w, natural_h) {
        log::warn!("[texture] {url} {natural_w}x{natural_h} scaled to {width}x{height}");
    }

    let scratch: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    scratch.set_width(width);
    scratch.set_height(height);
    let ctx: web::CanvasRenderingContext2d = scratch
        .get_context("2d")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("no 2d context"))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    ctx.draw_image_with_html_image_element_and_dw_and_dh(
        &img,
        0.0,
        0.0,
        width as f64,
        height as f64,
    )
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let data = ctx
        .get_image_data(0.0, 0.0, width as f64, height as f64)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let image = TextureImage::from_rgba(width, height, data.data().0)?;
    log::info!("[texture] {url} {}x{}", image.width, image.height);
    Ok(image)
}
