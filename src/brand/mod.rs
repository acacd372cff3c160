//! Static brand reference data. Nothing here is user-mutable; channels,
//! which are, live in [`channels`].

pub mod channels;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use channels::{Channel, ChannelRegistry, ChannelType, FileStore, MemoryStore, SettingsStore};

pub const MASCOT_NAME: &str = "Ziino";

pub const MASCOT_HASHTAGS: &[&str] = &[
    "#HayChăm",
    "#ZiinoConfession",
    "#NamTínhMới",
    "#TắmXongYêuLuôn",
    "#SạchLàChiêu",
    "#OniizXZiino",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrandId {
    Oniiz,
    V2joy,
}

impl BrandId {
    pub const ALL: [BrandId; 2] = [BrandId::Oniiz, BrandId::V2joy];

    pub fn as_str(&self) -> &'static str {
        match self {
            BrandId::Oniiz => "oniiz",
            BrandId::V2joy => "v2joy",
        }
    }

    pub fn pack(&self) -> &'static BrandPack {
        match self {
            BrandId::Oniiz => &BRAND_PACKS[0],
            BrandId::V2joy => &BRAND_PACKS[1],
        }
    }
}

impl fmt::Display for BrandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrandId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BrandId::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown brand: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub navy: &'static str,
    pub white: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fonts {
    pub heading: &'static str,
    pub body: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrandPack {
    pub id: BrandId,
    pub name: &'static str,
    pub palette: Palette,
    pub fonts: Fonts,
    pub taglines: &'static [&'static str],
    pub call_to_action: &'static [&'static str],
}

pub static BRAND_PACKS: [BrandPack; 2] = [
    BrandPack {
        id: BrandId::Oniiz,
        name: "Oniiz",
        palette: Palette {
            primary: "#0063B1",
            secondary: "#00B5D5",
            navy: "#00263A",
            white: "#FFFFFF",
        },
        fonts: Fonts {
            heading: "Montserrat",
            body: "Inter",
        },
        taglines: &["Người bạn hoàn hảo của phái mạnh", "Sạch để bật khí chất"],
        call_to_action: &[
            "Đã tắm Oniiz chưa? Vào đây để thơm.",
            "Thích thì yêu, còn sạch thì… yêu lâu.",
            "Trăm tips tán gái không bằng tắm sạch mỗi ngày.",
        ],
    },
    BrandPack {
        id: BrandId::V2joy,
        name: "V2Joy",
        palette: Palette {
            primary: "#6C3EF5",
            secondary: "#FF67D2",
            navy: "#2B1C4B",
            white: "#FFFFFF",
        },
        fonts: Fonts {
            heading: "Montserrat",
            body: "Inter",
        },
        taglines: &["Fun all the way"],
        call_to_action: &[
            "Yêu cho đã, fun all the way.",
            "Trò vui nào cũng cần chuẩn bị.",
            "Sạc cảm xúc trước khi yêu.",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_are_keyed_by_their_own_id() {
        for id in BrandId::ALL {
            assert_eq!(id.pack().id, id);
        }
        assert_eq!(BrandId::V2joy.pack().name, "V2Joy");
    }

    #[test]
    fn parses_brand_ids() {
        assert_eq!("ONIIZ".parse::<BrandId>().unwrap(), BrandId::Oniiz);
        assert!("acme".parse::<BrandId>().is_err());
    }
}
