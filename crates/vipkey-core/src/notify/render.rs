//! Turns an [`Event`] into an [`Embed`].
//!
//! Every event kind has one arm in [`Event::render`]. The formatting helpers
//! below are shared by all arms so that truncation, amount formatting and
//! secret masking behave the same everywhere.

use chrono::NaiveDateTime;

use crate::config::FieldLimits;

use super::embed::{colors, Embed, EmbedField};
use super::event::{Event, Health, Outcome};

const FOOTER_PREFIX: &str = "VIP Key System";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Display name for a subscription period code. Unknown codes pass through.
pub fn period_display(code: &str) -> &str {
    match code {
        "1d" => "1 ngày",
        "7d" => "7 ngày",
        "30d" => "30 ngày",
        "90d" => "90 ngày",
        other => other,
    }
}

/// `150000` -> `150,000 VNĐ`
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push_str(" VNĐ");
    out
}

/// First `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn inline_code(text: &str) -> String {
    format!("`{}`", text)
}

/// Hidden until clicked in the chat client.
pub fn spoiler(text: &str) -> String {
    format!("||`{}`||", text)
}

/// Truncates to `max` characters, then wraps in a code block.
pub fn code_block(text: &str, max: usize) -> String {
    format!("```{}```", truncate_chars(text, max))
}

fn footer(suffix: &str) -> String {
    format!("{} - {}", FOOTER_PREFIX, suffix)
}

impl Event {
    /// Render this event. `now` is the local wall-clock time used for the
    /// "Thời gian" fields.
    pub fn render(&self, limits: &FieldLimits, now: NaiveDateTime) -> Embed {
        let now = now.format(TIME_FORMAT).to_string();

        match self {
            Event::OrderCreated { uid, timestamp } => Embed::new(
                "<:tick:1441683459012821002> Đơn Hàng Mới",
                "Đơn hàng mới đã được tạo trong hệ thống",
                colors::BLUE,
            )
            .with_fields(vec![
                EmbedField::inline("UID", inline_code(uid)),
                EmbedField::inline("Trạng thái", "Chờ thanh toán"),
                EmbedField::block(
                    "Thời gian",
                    timestamp
                        .as_deref()
                        .filter(|t| !t.is_empty())
                        .map(str::to_owned)
                        .unwrap_or(now),
                ),
            ])
            .with_footer(footer("Order Tracking")),

            Event::PaymentConfirmed {
                uid,
                amount,
                period,
                promo_code,
                tx_details,
            } => {
                let mut fields = vec![
                    EmbedField::inline("UID", inline_code(uid)),
                    EmbedField::inline("Số tiền", format_amount(*amount)),
                    EmbedField::inline("Gói", period_display(period)),
                ];
                if let Some(code) = promo_code.as_deref().filter(|c| !c.is_empty()) {
                    fields.push(EmbedField::inline("Mã giảm giá", inline_code(code)));
                }
                if let Some(tx) = tx_details.as_deref().filter(|t| !t.is_empty()) {
                    fields.push(EmbedField::block(
                        "Chi tiết giao dịch",
                        code_block(tx, limits.short),
                    ));
                }
                Embed::new(
                    "<:CarteTired:1442053976710185155> Thanh Toán Thành Công",
                    "Thanh toán đã được xác nhận qua MBBank API",
                    colors::GREEN,
                )
                .with_fields(fields)
                .with_footer(footer("Payment Confirmed"))
            }

            Event::KeySent {
                uid,
                email,
                key,
                period,
                outcome,
            } => match outcome {
                Outcome::Success => Embed::new(
                    "✅ Key Đã Gửi",
                    "Key đã được gửi thành công qua email",
                    colors::DARK_GREEN,
                )
                .with_fields(vec![
                    EmbedField::inline("UID", inline_code(uid)),
                    EmbedField::inline("Email", email.as_str()),
                    EmbedField::inline("Gói", period_display(period)),
                    EmbedField::block("Key", spoiler(key)),
                ])
                .with_footer(footer("Key Delivery")),
                Outcome::Failure(error) => Embed::new(
                    "❌ Gửi Key Thất Bại",
                    "Không thể gửi key qua email",
                    colors::RED,
                )
                .with_fields(vec![
                    EmbedField::inline("UID", inline_code(uid)),
                    EmbedField::inline("Email", email.as_str()),
                    EmbedField::block("Lỗi", code_block(error, limits.short)),
                ])
                .with_footer(footer("Key Delivery Failed")),
            },

            Event::ApiError {
                api_name,
                error,
                details,
            } => {
                let mut fields = vec![
                    EmbedField::inline("API", api_name.as_str()),
                    EmbedField::inline("Thời gian", now),
                    EmbedField::block("Lỗi", code_block(error, limits.long)),
                ];
                if let Some(details) = details.as_deref().filter(|d| !d.is_empty()) {
                    fields.push(EmbedField::block("Chi tiết", code_block(details, limits.long)));
                }
                Embed::new("⚠️ Lỗi API", "Phát hiện lỗi khi gọi API", colors::ORANGE)
                    .with_fields(fields)
                    .with_footer(footer("API Error"))
            }

            Event::GithubSync {
                action,
                file_path,
                outcome,
            } => {
                let (title, description, color, status) = match outcome {
                    Outcome::Success => (
                        "🔄 GitHub Sync",
                        "Đồng bộ dữ liệu với GitHub thành công",
                        colors::PURPLE,
                        EmbedField::block("Trạng thái", "✅ Thành công"),
                    ),
                    Outcome::Failure(error) => (
                        "⚠️ GitHub Sync Error",
                        "Lỗi khi đồng bộ với GitHub",
                        colors::RED,
                        EmbedField::block("Lỗi", code_block(error, limits.medium)),
                    ),
                };
                Embed::new(title, description, color)
                    .with_fields(vec![
                        EmbedField::inline("Hành động", action.as_str()),
                        EmbedField::inline("File", inline_code(file_path)),
                        status,
                    ])
                    .with_footer(footer("GitHub Integration"))
            }

            Event::DeploymentStatus { outcome, version } => match outcome {
                Outcome::Success => {
                    let mut fields = vec![
                        EmbedField::inline("Trạng thái", "✅ Deploy thành công"),
                        EmbedField::inline("Thời gian", now),
                    ];
                    if let Some(v) = version.as_deref().filter(|v| !v.is_empty()) {
                        fields.push(EmbedField::block("Version", inline_code(v)));
                    }
                    Embed::new(
                        "🚀 Fly.io Deployment",
                        "Application đã được deploy thành công",
                        colors::BLUE,
                    )
                    .with_fields(fields)
                    .with_footer(footer("Fly.io"))
                }
                Outcome::Failure(logs) => {
                    let mut fields = vec![
                        EmbedField::inline("Trạng thái", "❌ Deploy thất bại"),
                        EmbedField::inline("Thời gian", now),
                    ];
                    if !logs.is_empty() {
                        fields.push(EmbedField::block("Logs", code_block(logs, limits.long)));
                    }
                    Embed::new(
                        "⚠️ Fly.io Deployment Failed",
                        "Deployment gặp lỗi",
                        colors::RED,
                    )
                    .with_fields(fields)
                    .with_footer(footer("Fly.io"))
                }
            },

            Event::SystemStatus { health, metrics } => {
                let (title, description, color) = match health {
                    Health::Healthy => (
                        "✅ System Healthy",
                        "Hệ thống hoạt động bình thường",
                        colors::GREEN,
                    ),
                    Health::Warning => ("⚠️ System Warning", "Hệ thống có cảnh báo", colors::AMBER),
                    Health::Critical => (
                        "❌ System Critical",
                        "Hệ thống gặp vấn đề nghiêm trọng",
                        colors::RED,
                    ),
                };
                let mut fields = vec![EmbedField::block("Thời gian", now)];
                fields.extend(metrics.iter().map(|(name, value)| {
                    let value = match value {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    EmbedField::inline(name.as_str(), value)
                }));
                Embed::new(title, description, color)
                    .with_fields(fields)
                    .with_footer(footer("Health Check"))
            }

            Event::CouponUsed {
                code,
                uid,
                discount,
                period,
            } => Embed::new(
                "🎫 Coupon Sử Dụng",
                "Mã giảm giá đã được áp dụng",
                colors::GOLD,
            )
            .with_fields(vec![
                EmbedField::inline("Mã", inline_code(code)),
                EmbedField::inline("UID", inline_code(uid)),
                EmbedField::inline("Giảm giá", format!("{}%", discount)),
                EmbedField::inline("Gói", period_display(period)),
                EmbedField::block("Thời gian", now),
            ])
            .with_footer(footer("Coupon Tracking")),

            Event::AutoSyncSummary {
                sync_types,
                success_count,
                failed_count,
                interval_minutes,
            } => {
                let (color, status) = sync_status(*success_count, *failed_count);
                let mut fields = vec![
                    EmbedField::inline("Trạng thái", status),
                    EmbedField::inline("Khoảng thời gian", format!("{} phút", interval_minutes)),
                    EmbedField::block("Thời gian", now),
                ];
                if !sync_types.is_empty() {
                    let list = sync_types
                        .iter()
                        .map(|t| format!("• {}", t))
                        .collect::<Vec<_>>()
                        .join("\n");
                    fields.push(EmbedField::block("Loại data đã sync", list));
                }
                if *success_count > 0 || *failed_count > 0 {
                    let mut result = format!("Thành công: {}", success_count);
                    if *failed_count > 0 {
                        result.push_str(&format!(" | Thất bại: {}", failed_count));
                    }
                    fields.push(EmbedField::block("Kết quả", result));
                }
                Embed::new(
                    "🔄 Auto-Sync Hoàn Tất",
                    "Tự động đồng bộ dữ liệu từ GitHub",
                    color,
                )
                .with_fields(fields)
                .with_footer(footer("Auto-Sync"))
            }
        }
    }
}

/// Color and status text for a batch of sync results.
pub fn sync_status(success_count: u32, failed_count: u32) -> (u32, &'static str) {
    if failed_count == 0 {
        (colors::GREEN, "✅ Hoàn tất")
    } else if success_count > 0 {
        (colors::AMBER, "⚠️ Một phần")
    } else {
        (colors::RED, "❌ Thất bại")
    }
}
