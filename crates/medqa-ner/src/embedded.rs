//! Built-in demo dictionary.
//!
//! A small catalogue covering every category, used when no entity export is
//! available (offline demos, tests). Production deployments load the full
//! graph export through [`crate::loader`].

use medqa_common::{Category, PatternEntry};

const DISEASES: &[&str] = &[
    "高血压", "糖尿病", "感冒", "肺结核", "偏头痛", "胃炎", "肝炎", "心脏病",
    "白血病", "甲状腺炎", "支气管炎", "肿瘤", "流感", "肺炎", "慢性肺炎",
];

const SYMPTOMS: &[&str] = &[
    "头晕", "咳嗽", "发烧", "胃痛", "恶心", "乏力", "食欲不振", "剧烈头痛", "流鼻涕",
];

const DRUGS: &[&str] = &[
    "阿莫西林", "布洛芬", "奥美拉唑", "降压药", "抗生素", "头孢", "阿司匹林", "止痛药", "感冒药",
];

const CHECKS: &[&str] = &["胃镜检查", "心电图", "血常规", "CT", "核磁共振", "X光"];

const DEPARTMENTS: &[&str] = &[
    "内科", "外科", "儿科", "呼吸科", "心内科", "消化科", "神经内科", "肿瘤科", "中医科", "心血管内科",
];

const FOODS: &[&str] = &["辣椒", "肥肉", "米饭", "水果", "蔬菜", "牛奶", "鸡蛋"];

const PRODUCERS: &[&str] = &["华北制药", "哈药集团", "拜耳"];

fn names(category: Category) -> &'static [&'static str] {
    match category {
        Category::Disease    => DISEASES,
        Category::Symptom    => SYMPTOMS,
        Category::Drug       => DRUGS,
        Category::Check      => CHECKS,
        Category::Department => DEPARTMENTS,
        Category::Food       => FOODS,
        Category::Producer   => PRODUCERS,
    }
}

/// Every demo entry, grouped by category in [`Category::ALL`] order.
pub fn demo_patterns() -> Vec<PatternEntry> {
    Category::ALL
        .into_iter()
        .flat_map(|cat| names(cat).iter().map(move |n| PatternEntry::new(*n, cat)))
        .collect()
}
