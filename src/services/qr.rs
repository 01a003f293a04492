//! # 微信二维码

use qrcode::QrCode;
use qrcode::render::svg;

/// 二维码最小边长（像素）
const QR_MIN_SIZE: u32 = 200;

/// 微信"添加好友"深链
pub fn wechat_uri(handle: &str) -> String {
    format!("weixin://dl/chat?{}", handle)
}

/// 把任意文本渲染为 SVG 二维码（白底黑码）
pub fn render_svg(data: &str) -> Result<String, String> {
    let code = QrCode::new(data.as_bytes()).map_err(|e| format!("生成二维码失败: {}", e))?;
    Ok(code
        .render::<svg::Color<'_>>()
        .min_dimensions(QR_MIN_SIZE, QR_MIN_SIZE)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build())
}
