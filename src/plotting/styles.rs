use plotters::style::RGBAColor;

/// Chart theme configuration
#[derive(Debug, Clone)]
pub struct ChartTheme {
    pub background_color: RGBAColor,
    pub text_color: RGBAColor,
    pub grid_color: RGBAColor,
    pub axis_color: RGBAColor,
    pub ascent_color: RGBAColor,
    pub calories_color: RGBAColor,
    pub ratio_color: RGBAColor,
    pub ride_color: RGBAColor,
    pub ebike_color: RGBAColor,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background_color: RGBAColor(0, 0, 0, 0.94),
            text_color: RGBAColor(255, 255, 255, 0.8),
            grid_color: RGBAColor(255, 255, 255, 0.15),
            axis_color: RGBAColor(255, 255, 255, 0.8),
            ascent_color: RGBAColor(135, 206, 250, 0.9),
            calories_color: RGBAColor(250, 128, 114, 0.9),
            ratio_color: RGBAColor(152, 251, 152, 0.9),
            ride_color: RGBAColor(100, 149, 237, 0.85),
            ebike_color: RGBAColor(255, 165, 0, 0.85),
        }
    }
}

/// Chart style configuration
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub line_width: u32,
    pub font_size: u32,
    pub caption_size: u32,
    pub margin: u32,
    pub label_area_size: u32,
    /// Series with at most this many points also get point markers
    pub marker_limit: usize,
    /// Draw captions, axis labels and legends
    pub text: bool,
}

impl ChartStyle {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 960,
            height: 400,
            line_width: 2,
            font_size: 15,
            caption_size: 24,
            margin: 10,
            label_area_size: 60,
            marker_limit: 60,
            text: true,
        }
    }
}
