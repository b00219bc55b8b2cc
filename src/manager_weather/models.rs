use serde::Deserialize;

#[derive(Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub metadata: Metadata,
    pub data_1h: Data1h,
}

#[derive(Deserialize, Default)]
pub struct Metadata {
    /// Offset of the site's local time from UTC in hours
    #[serde(default)]
    pub utc_timeoffset: f64,
}

#[derive(Deserialize)]
pub struct Data1h {
    pub time: Vec<String>,
    pub temperature: Vec<f64>,
    pub ghi_instant: Vec<f64>,
    pub dni_instant: Vec<f64>,
    pub dif_instant: Vec<f64>,
    pub windspeed: Vec<f64>,
    pub winddirection: Vec<f64>,
    pub precipitation: Vec<f64>,
    pub snowfraction: Vec<f64>,
}

#[derive(Deserialize)]
pub struct TmyResponse {
    pub outputs: TmyOutputs,
}

#[derive(Deserialize)]
pub struct TmyOutputs {
    pub tmy_hourly: Vec<TmyHour>,
}

#[derive(Deserialize)]
pub struct TmyHour {
    #[serde(rename = "time(UTC)")]
    pub time: String,
    #[serde(rename = "T2m")]
    pub temp_air: f64,
    #[serde(rename = "G(h)")]
    pub ghi: f64,
    #[serde(rename = "Gb(n)")]
    pub dni: f64,
    #[serde(rename = "Gd(h)")]
    pub dhi: f64,
    #[serde(rename = "WS10m")]
    pub wind_speed: f64,
    #[serde(rename = "WD10m")]
    pub wind_direction: f64,
}
