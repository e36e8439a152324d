//! Maps provider condition codes to a backdrop image and gradient.

/// Condition bucket a provider code falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionBucket {
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Rain,
    Thunderstorm,
    Snow,
}

impl ConditionBucket {
    /// Thunderstorm codes are tested before snow; `1279` and `1282` belong to both lists.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1000 => Some(Self::Clear),
            1003 => Some(Self::PartlyCloudy),
            1006 | 1009 => Some(Self::Cloudy),
            1030 | 1135 | 1147 => Some(Self::Fog),
            1063 | 1150 | 1153 | 1180 | 1183 | 1186 | 1189 | 1192 | 1195 | 1240 | 1243 | 1246 => {
                Some(Self::Rain)
            }
            1087 | 1273 | 1276 | 1279 | 1282 => Some(Self::Thunderstorm),
            1066 | 1114 | 1117 | 1210 | 1213 | 1216 | 1219 | 1222 | 1225 | 1255 | 1258 => {
                Some(Self::Snow)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::PartlyCloudy => "partly-cloudy",
            Self::Cloudy => "cloudy",
            Self::Fog => "fog",
            Self::Rain => "rain",
            Self::Thunderstorm => "thunderstorm",
            Self::Snow => "snow",
        }
    }
}

/// Pair of gradient stops, as `color-shade/opacity` tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    pub from: &'static str,
    pub to: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Background {
    pub bucket: ConditionBucket,
    pub is_day: bool,
    pub image_url: &'static str,
    pub gradient: Gradient,
}

const CLEAR_DAY_URL: &str = "https://images.pexels.com/photos/3768/sky-sunny-clouds-cloudy.jpg";
const CLEAR_NIGHT_URL: &str = "https://images.pexels.com/photos/1257860/pexels-photo-1257860.jpeg";
const PARTLY_CLOUDY_URL: &str =
    "https://images.pexels.com/photos/531756/pexels-photo-531756.jpeg";
const CLOUDY_DAY_URL: &str =
    "https://images.pexels.com/photos/158163/clouds-cloudporn-weather-lookup-158163.jpeg";
const CLOUDY_NIGHT_URL: &str = "https://images.pexels.com/photos/414659/pexels-photo-414659.jpeg";
const FOG_URL: &str = "https://images.pexels.com/photos/1287075/pexels-photo-1287075.jpeg";
const RAIN_URL: &str = "https://images.pexels.com/photos/125510/pexels-photo-125510.jpeg";
const THUNDER_URL: &str = "https://images.pexels.com/photos/1118869/pexels-photo-1118869.jpeg";
const SNOW_URL: &str = "https://images.pexels.com/photos/688660/pexels-photo-688660.jpeg";

const fn gradient(from: &'static str, to: &'static str) -> Gradient {
    Gradient { from, to }
}

/// Backdrop for a condition code. Unknown codes use the clear-sky entry.
pub fn select(condition_code: u32, is_day: bool) -> Background {
    let bucket = ConditionBucket::from_code(condition_code).unwrap_or(ConditionBucket::Clear);

    let (image_url, gradient) = match (bucket, is_day) {
        (ConditionBucket::Clear, true) => (CLEAR_DAY_URL, gradient("blue-500/80", "blue-900/50")),
        (ConditionBucket::Clear, false) => {
            (CLEAR_NIGHT_URL, gradient("indigo-900/80", "purple-900/50"))
        }
        (ConditionBucket::PartlyCloudy, true) => {
            (PARTLY_CLOUDY_URL, gradient("blue-400/70", "blue-700/50"))
        }
        (ConditionBucket::PartlyCloudy, false) => {
            (PARTLY_CLOUDY_URL, gradient("indigo-800/80", "purple-900/50"))
        }
        (ConditionBucket::Cloudy, true) => (CLOUDY_DAY_URL, gradient("gray-400/70", "gray-700/50")),
        (ConditionBucket::Cloudy, false) => {
            (CLOUDY_NIGHT_URL, gradient("gray-800/80", "gray-900/50"))
        }
        (ConditionBucket::Fog, _) => (FOG_URL, gradient("gray-300/70", "gray-600/50")),
        (ConditionBucket::Rain, _) => (RAIN_URL, gradient("blue-700/70", "blue-900/50")),
        (ConditionBucket::Thunderstorm, _) => {
            (THUNDER_URL, gradient("gray-800/80", "gray-900/50"))
        }
        (ConditionBucket::Snow, _) => (SNOW_URL, gradient("blue-200/70", "blue-400/50")),
    };

    Background { bucket, is_day, image_url, gradient }
}
