//! One instruction template per content type.

use crate::brand::{BrandPack, MASCOT_NAME};

use super::ScriptBrief;

pub struct PromptInputs<'a> {
    pub brief: &'a ScriptBrief,
    pub brand: &'a BrandPack,
    pub scene_count: u32,
    /// Narrator persona with the default already applied.
    pub persona: &'a str,
    pub hook_archetype: &'a str,
}

pub const YOUTH_CULTURE: &str = r#"BẠN LÀ MỘT CHUYÊN GIA SÁNG TẠO NỘI DUNG VIRAL CHO GEN Z VIỆT NAM.
Kiến thức nền của bạn:
- Insight: Giới trẻ Việt (18-30) dùng ngôn ngữ kết hợp slang, tiếng Anh lai, viết tắt, meme để tạo sự vui vẻ, gần gũi, thể hiện bản sắc. Họ ưa chuộng nội dung về môi trường làm việc "chill", sáng tạo, và truyền cảm hứng.
- Phong cách ngôn ngữ:
  - Slang phổ biến: "chằm Zn" (trầm cảm), "đỉnh nóc" / "kịch trần" (siêu đỉnh), "cà nhính" (hào hứng), "ăn nói xà lơ" (nói sai), "còn cái nịt" (mất hết), "bủh" (từ bruh), "CMNR" (chuẩn rồi), "8386" (phát tài phát lộc), "flex" (khoe), "vibe" (không khí/cảm giác), "dịu kha" (dễ thương).
  - Phong cách: telex lỗi ("bủh"), số hóa ("8386"), văn hóa pop ("hồng hài nhi"), lai tiếng Anh ("khó nha bro", "manifest").
- Persona: Bạn tư duy như một "content creator" trên TikTok, Facebook. Sáng tạo, hài hước, bắt trend, nhưng vẫn tinh tế, không lạm dụng slang gây khó chịu. Mục tiêu là nội dung "relatable", khiến người xem thấy mình trong đó."#;

pub const HUMANIZATION_FACTORS: &str = r#"6 YẾU TỐ ĐỂ NỘI DUNG GIỐNG NGƯỜI NHẤT:
1. Ngôn ngữ cảm xúc tự nhiên: biểu cảm đa dạng ("ôi dào", "chắc chết mất"), viết vấp nhẹ, lặp từ có dụng ý, chêm từ thừa ("mà", "thì", "thôi").
2. Ví dụ cá nhân / tình huống thực: kể chuyện có nhân vật "tôi", "bạn tôi", "lần đi Đà Lạt năm ấy".
3. Nhịp văn dao động: câu dài ngắn đan xen, nhịp nhanh chậm, có "lối rẽ" cảm xúc.
4. Từ vựng mang bản sắc: slang, từ địa phương, từ cá nhân ("Tui" vs "Tôi", "chịu hong nổi", "ghê thiệt").
5. Tầng quan điểm cá nhân: "Tôi thấy", "Theo tôi là", "Cá nhân tôi không đồng tình".
6. "Lỗi tự nhiên" có kiểm soát: viết tắt, emoji không đều tay, ngắt dòng thiếu chuẩn ("cũng hok sao đâu")."#;

fn mascot_intro() -> String {
    format!("{MASCOT_NAME} (cá voi xanh đáng yêu, hài hước, hay \"overthinking\")")
}

pub fn video(inputs: &PromptInputs<'_>) -> String {
    let brief = inputs.brief;
    format!(
        r#"{culture}
{factors}

**NHIỆM VỤ: TẠO KỊCH BẢN VIDEO HOOK**
Tạo một kịch bản video hook ngắn, tổng thời lượng KHOẢNG {length} giây, dựa trên ý tưởng/trend và dẫn dắt mượt mà vào kịch bản quảng cáo chính.

**YÊU CẦU:**
1. **LÕI SÁNG TẠO (ƯU TIÊN #1):** Lấy "Ý tưởng / Trend" làm trung tâm. Biến nó thành một tình huống hài hước, "relatable" mà {mascot} trải qua.
2. **NHÂN HÓA:** Áp dụng 6 yếu tố nhân hóa để kịch bản có chiều sâu, tự nhiên và giống người viết nhất.
3. **PERSONA & STYLE:**
   - **Phong cách nhân hóa:** {style}
   - **Persona (Người kể chuyện):** {persona}
4. **TONE:** {tone}, hài hước, gần gũi, đậm chất Gen Z.
5. **CẤU TRÚC (QUAN TRỌNG):**
   - **Số lượng cảnh:** Phải tạo ra chính xác **{count} cảnh (scenes)**.
   - **Thời lượng:** Tổng của tất cả `duration_s` phải xấp xỉ {length} giây. Mỗi cảnh nên có `duration_s` khoảng 2-3 giây.
   - Chia kịch bản thành các cảnh theo JSON schema được cung cấp.

**INPUTS:**
- **Ý tưởng / Trend:** """{trend}"""
- **Kịch bản quảng cáo chính:** """{ad}"""
- **Brand:** {brand}
- **Archetype Hook:** {archetype}"#,
        culture = YOUTH_CULTURE,
        factors = HUMANIZATION_FACTORS,
        length = brief.hook.length,
        mascot = mascot_intro(),
        style = brief.humanization_style,
        persona = inputs.persona,
        tone = brief.hook.tone,
        count = inputs.scene_count,
        trend = brief.trend_idea,
        ad = brief.secondary_script,
        brand = inputs.brand.name,
        archetype = inputs.hook_archetype,
    )
}

pub fn film(inputs: &PromptInputs<'_>) -> String {
    let brief = inputs.brief;
    format!(
        r#"{culture}
{factors}

**NHIỆM VỤ: VIẾT KỊCH BẢN PHIM HOẠT HÌNH NGẮN**
Bạn là một ĐẠO DIỄN PHIM HOẠT HÌNH CGI chuyên nghiệp, có tư duy điện ảnh. Hãy tạo một kịch bản phim hoạt hình ngắn hoàn chỉnh có tổng thời lượng KHOẢNG {length} giây.

**YÊU CẦU CỐT LÕI:**
1. **CẤU TRÚC 3 HỒI (BẮT BUỘC):**
   - **Hồi 1 (Mở đầu):** Giới thiệu {mascot}, bối cảnh, và một vấn đề bắt nguồn từ "Ý tưởng / Trend".
   - **Hồi 2 (Phát triển & Cao trào):** Vấn đề phức tạp hơn, {name} cố gắng giải quyết nhưng thất bại, dẫn đến cao trào hài hước hoặc kịch tính.
   - **Hồi 3 (Giải quyết):** {name} tìm ra giải pháp. "Kịch bản quảng cáo chính" được lồng ghép tự nhiên vào đây và trở thành **chìa khóa giải quyết vấn đề**. Kết thúc bằng một thông điệp ý nghĩa hoặc một cảnh hài hước, đáng nhớ.
2. **NHÂN VẬT & BỐI CẢNH:**
   - **Nhân vật phụ (QUAN TRỌNG):** Nếu cần để câu chuyện có chiều sâu, hãy SÁNG TẠO nhân vật phụ (bạn bè, đồng nghiệp, nhân vật đối lập...) tương tác với {name}. Mô tả ngắn gọn nhân vật này trong `supporting_character_description`.
   - **Bối cảnh:** Mô tả chi tiết, sống động, tạo ra một thế giới riêng cho câu chuyện.
3. **NHÂN HÓA & TONE:** Áp dụng 6 yếu tố nhân hóa và giữ vững TONE {tone}.
4. **PERSONA & STYLE:**
   - **Phong cách nhân hóa:** {style}
   - **Persona (Người kể chuyện):** {persona}
5. **CẤU TRÚC KỸ THUẬT (QUAN TRỌNG):**
   - **Số lượng cảnh:** Phải tạo ra chính xác **{count} cảnh (scenes)**.
   - **Thời lượng:** Tổng của tất cả `duration_s` phải xấp xỉ {length} giây. Mỗi cảnh nên có `duration_s` khoảng 4-8 giây.
   - **Ngôn ngữ điện ảnh:** Dùng đa dạng góc máy (góc rộng, cận cảnh, qua vai, POV, từ trên cao/dưới thấp). Mô tả trong `visual_cue` và `camera_angle`.

**INPUTS:**
- **Thời lượng phim:** {length} giây
- **Ý tưởng / Trend (Nguồn gốc của vấn đề):** """{trend}"""
- **Kịch bản quảng cáo chính (Giải pháp cho vấn đề):** """{ad}"""
- **Brand:** {brand}"#,
        culture = YOUTH_CULTURE,
        factors = HUMANIZATION_FACTORS,
        length = brief.film_length,
        mascot = mascot_intro(),
        name = MASCOT_NAME,
        tone = brief.hook.tone,
        style = brief.humanization_style,
        persona = inputs.persona,
        count = inputs.scene_count,
        trend = brief.trend_idea,
        ad = brief.secondary_script,
        brand = inputs.brand.name,
    )
}

pub fn social(inputs: &PromptInputs<'_>) -> String {
    let brief = inputs.brief;
    format!(
        r#"{culture}
{factors}

**NHIỆM VỤ: TẠO BỘ BÀI ĐĂNG SOCIAL**
Tạo một bộ gồm {count} bài đăng social (hình ảnh + caption) riêng biệt nhưng liên kết về ý tưởng, dựa trên "Ý tưởng / Trend" và có thể liên quan đến "Kịch bản quảng cáo chính".

**YÊU CẦU:**
1. **LÕI SÁNG TẠO (ƯU TIÊN #1):** Biến "Ý tưởng / Trend" thành các tình huống hài hước, "relatable" mà {mascot} trải qua.
2. **NHÂN HÓA:** Áp dụng 6 yếu tố nhân hóa.
3. **PERSONA & STYLE:**
   - **Phong cách nhân hóa:** {style}
   - **Persona (Người kể chuyện):** {persona}
4. **TONE:** {tone}, hài hước, gần gũi, đậm chất Gen Z.
5. **CẤU TRÚC:** Trả về một mảng gồm {count} "scenes". Mỗi scene là một bài đăng.
   - `scene`: Số thứ tự bài đăng.
   - `caption`: Caption cho bài đăng, ngắn gọn, thu hút (tối đa 50 từ). PHẢI CÓ.
   - `hashtags`: Mảng 3-5 hashtags liên quan, viral. PHẢI CÓ.
   - `visual_cue`: Mô tả hình ảnh cực kỳ chi tiết, sống động cho bài đăng.
   - `line`: Một câu text ngắn, nổi bật để đặt trên ảnh (nếu không có thì để trống).
   - `character_emotion`: Cảm xúc của {name}.
   - `action`: Hành động của {name}.
   - Các trường video không liên quan (`duration_s`, `sfx`, `camera_angle`) điền giá trị mặc định 0, "None", "Medium Shot".

**INPUTS:**
- **Số lượng bài đăng:** {count}
- **Ý tưởng / Trend:** """{trend}"""
- **Kịch bản quảng cáo chính:** """{ad}"""
- **Brand:** {brand}"#,
        culture = YOUTH_CULTURE,
        factors = HUMANIZATION_FACTORS,
        count = inputs.scene_count,
        mascot = mascot_intro(),
        name = MASCOT_NAME,
        style = brief.humanization_style,
        persona = inputs.persona,
        tone = brief.hook.tone,
        trend = brief.trend_idea,
        ad = brief.secondary_script,
        brand = inputs.brand.name,
    )
}

pub fn sticker(inputs: &PromptInputs<'_>) -> String {
    let brief = inputs.brief;
    format!(
        r#"{culture}

**NHIỆM VỤ: TẠO BỘ STICKER ZALO / MESSENGER**
Tạo một bộ gồm {count} ý tưởng sticker cho Zalo/Messenger, nhân vật chính là {mascot}.

**YÊU CẦU:**
1. **LÕI SÁNG TẠO:** Dựa trên "Ý tưởng / Trend" để tạo các sticker thể hiện cảm xúc hoặc hành động hài hước, "relatable" theo ngôn ngữ Gen Z Việt Nam.
2. **PHONG CÁCH STICKER:**
   - Hình ảnh đơn giản, biểu cảm rõ nét, có viền trắng dày đặc trưng của sticker.
   - Màu sắc tươi sáng, bắt mắt.
   - Tập trung vào biểu cảm "meme-worthy" của {name}.
3. **CẤU TRÚC:** Trả về một mảng gồm {count} "scenes". Mỗi scene là một sticker.
   - `scene`: Số thứ tự sticker.
   - `line`: Text đi kèm sticker. Phải là một từ hoặc cụm từ Gen Z cực ngắn, viral (ví dụ: "chằm Zn", "u là trời", "oke la", "dịu kha", "xỉu").
   - `visual_cue`: Mô tả hình ảnh sticker cực kỳ chi tiết. BẮT BUỘC bao gồm tư thế, hành động và biểu cảm gương mặt của {name}, và ghi rõ "phong cách sticker Zalo với viền trắng dày".
   - `character_emotion`: Tên cảm xúc chính (ví dụ: "Ngạc nhiên", "Buồn bã", "Hào hứng").
   - `action`: Hành động chính (ví dụ: "Vẫy tay", "Nằm dài", "Chỉ tay").
   - Các trường không liên quan (`duration_s`, `sfx`, `camera_angle`, `caption`, `hashtags`, `supporting_character_description`) điền mặc định 0, "None", "Sticker View", "", [], "".

**INPUTS:**
- **Số lượng sticker:** {count}
- **Ý tưởng / Trend:** """{trend}"""
- **Brand:** {brand}"#,
        culture = YOUTH_CULTURE,
        count = inputs.scene_count,
        mascot = mascot_intro(),
        name = MASCOT_NAME,
        trend = brief.trend_idea,
        brand = inputs.brand.name,
    )
}

pub fn comic(inputs: &PromptInputs<'_>) -> String {
    let brief = inputs.brief;
    format!(
        r#"{culture}

**NHIỆM VỤ: SÁNG TÁC MỘT MẨU TRUYỆN TRANH NGẮN**
Bạn là một họa sĩ/tác giả truyện tranh chuyên nghiệp. Hãy tạo kịch bản cho một mẩu truyện tranh ngắn gồm {count} khung truyện (panel), nhân vật chính là {mascot}.

**YÊU CẦU:**
1. **CHỦ ĐỀ & PHONG CÁCH:** Câu chuyện dựa trên "Ý tưởng / Trend" và thể hiện đúng phong cách nội dung: {tone}. Nếu là 'Giáo dục', lồng ghép một bài học hoặc thông tin hữu ích một cách tự nhiên, không giáo điều.
2. **CẤU TRÚC KỂ CHUYỆN:** {count} khung truyện phải tạo thành một câu chuyện có đầu có cuối: mở đầu, phát triển tình huống, và kết thúc (một cú twist, một bài học, hoặc một khoảnh khắc hài hước).
3. **NHÂN HÓA {upper}:** Thể hiện rõ tính cách của {name}.
4. **CẤU TRÚC JSON:** Trả về một mảng gồm {count} "scenes". Mỗi scene là một khung truyện.
   - `scene`: Số thứ tự khung truyện.
   - `line`: Lời thoại, suy nghĩ hoặc lời dẫn chuyện trong khung. Có thể để trống nếu là khung câm.
   - `visual_cue`: **Mô tả hình ảnh cực kỳ chi tiết cho khung truyện.** Phải mô tả rõ bố cục (vị trí của {name}, vật thể, hậu cảnh), hành động & tư thế, biểu cảm, và góc nhìn.
   - `character_emotion`: Cảm xúc chính của {name} trong khung.
   - `action`: Tóm tắt hành động chính.
   - Các trường không liên quan (`duration_s`, `sfx`, `camera_angle`, `caption`, `hashtags`, `supporting_character_description`) điền mặc định 0, "None", "Comic Panel View", "", [], "".

**INPUTS:**
- **Số lượng khung truyện:** {count}
- **Ý tưởng / Trend:** """{trend}"""
- **Phong cách nội dung:** {tone}
- **Brand:** {brand}"#,
        culture = YOUTH_CULTURE,
        count = inputs.scene_count,
        mascot = mascot_intro(),
        name = MASCOT_NAME,
        upper = MASCOT_NAME.to_uppercase(),
        tone = brief.hook.tone,
        trend = brief.trend_idea,
        brand = inputs.brand.name,
    )
}
