use crate::domain::model::BillOutput;
use crate::domain::services::split_calculator::DEFAULT_SCALE;
use rust_decimal::{Decimal, RoundingStrategy};

/// 將分帳結果格式化為文字報表（金額固定一位小數）
pub fn format_as_text(output: &BillOutput) -> String {
    format_as_text_with_scale(output, DEFAULT_SCALE)
}

pub fn format_as_text_with_scale(output: &BillOutput, scale: u32) -> String {
    let mut text = String::from("===== 聚餐分帳結果 =====\n");
    text.push_str(&format!("日期：{}\n", output.date));
    text.push_str(&format!("地點：{}\n\n", output.location));
    text.push_str(&format!("小結：${}\n\n", money(output.sub_total, scale)));
    text.push_str(&format!("小費：${}\n\n", money(output.tip, scale)));
    text.push_str(&format!(
        "總金額：${}\n\n",
        money(output.total_amount, scale)
    ));
    text.push_str("分帳結果：\n");

    for (index, item) in output.items.iter().enumerate() {
        text.push_str(&format!(
            "{}. {} 應付：${}\n",
            index + 1,
            item.name,
            money(item.amount, scale)
        ));
    }

    text
}

fn money(value: Decimal, scale: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(scale);
    rounded.to_string()
}
