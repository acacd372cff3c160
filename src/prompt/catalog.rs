//! Creative option lists offered to the user.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookTemplate {
    pub id: &'static str,
    pub name: &'static str,
}

pub const HOOK_TEMPLATES: &[HookTemplate] = &[
    HookTemplate { id: "pov", name: "POV / Tự Thú" },
    HookTemplate { id: "pattern_interrupt", name: "Lật Bài Bất Ngờ" },
    HookTemplate { id: "before_after", name: "Biến Hình Before/After" },
    HookTemplate { id: "curiosity", name: "Tò Mò Khó Cưỡng" },
    HookTemplate { id: "fact_cine", name: "Fact-Cinematic" },
    HookTemplate { id: "challenge", name: "Thử Thách / Checklist" },
];

/// Display name of a hook archetype; unknown ids pass through untouched.
pub fn hook_archetype(style: &str) -> &str {
    HOOK_TEMPLATES
        .iter()
        .find(|t| t.id == style)
        .map(|t| t.name)
        .unwrap_or(style)
}

pub const TONES: &[&str] = &[
    "Hài hước (Meme)",
    "Sâu lắng (Chằm Zn)",
    "Truyền cảm hứng (Flexing)",
    "Kịch tính (Plot Twist)",
    "Gần gũi (Relatable)",
];

pub const COMIC_STYLES: &[&str] = &[
    "Giáo dục",
    "Hài hước",
    "Đời thường (Slice-of-life)",
    "Phiêu lưu",
    "Lãng mạn",
];

pub const COMIC_IMAGE_STYLES: &[&str] = &[
    "Manga (đen trắng)",
    "Webtoon (Hàn Quốc)",
    "Chibi (dễ thương)",
    "American Comic (Cổ điển)",
    "Digital Art (Hiện đại)",
    "Màu nước (Watercolor)",
];

pub const HUMANIZATION_STYLES: &[&str] = &[
    "Thân mật đời thường",
    "Hội thoại đời sống",
    "Kể chuyện như bạn thân",
    "Góc nhìn cá nhân sâu sắc",
    "Biểu cảm cảm xúc mạnh",
    "Văn phong \"vỡ cấu trúc\"",
];

/// Hook lengths in seconds.
pub const VIDEO_LENGTHS: &[u32] = &[8, 10, 15, 25, 40];

/// Film lengths in seconds.
pub const FILM_LENGTHS: &[u32] = &[60, 90, 180];
