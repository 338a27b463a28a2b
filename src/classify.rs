//! Keyword heuristics that bucket articles into industries and themes.
//!
//! Every table is matched by case-insensitive substring containment against the
//! article's `title brief` text. Bucketing tables are ordered: the first bucket
//! with any matching keyword wins, and unmatched articles land in [`OTHER`].

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Article;

/// Catch-all bucket for articles no keyword table matched
pub const OTHER: &str = "其他";

pub type KeywordTable = &'static [(&'static str, &'static [&'static str])];

pub const INDUSTRY_CATEGORIES: KeywordTable = &[
    ("化工", &["化工", "石化", "化肥", "农药", "塑料", "基础化工", "新材料"]),
    ("军工", &["军工", "国防", "航空", "航天", "武器", "航空发动机"]),
    ("医药", &["医药", "生物", "制药", "医疗", "健康", "创新药", "保健品"]),
    ("汽车", &["汽车", "新能源车", "智能汽车", "汽车零部件"]),
    ("金融", &["银行", "证券", "保险", "金融", "稳定币"]),
    ("房地产", &["房地产", "地产", "物业", "建筑", "建材"]),
    ("能源", &["煤炭", "石油", "电力", "新能源", "风电", "核聚变", "氢能", "锂电池"]),
    ("有色金属", &["有色金属", "金属", "钢铁", "白银"]),
    ("消费", &["食品饮料", "纺织服装", "小家电", "乳制品", "白酒", "啤酒", "消费"]),
    ("科技", &["半导体", "AI", "电子", "存储", "机器人", "人形机器人"]),
    ("农业", &["农林牧渔", "农业", "宠物经济"]),
    ("交通运输", &["交通运输", "港口航运", "物流"]),
    ("传媒", &["传媒", "短剧", "社会服务"]),
    ("轻工制造", &["轻工", "制造", "机械", "逆变器"]),
];

pub const MACRO_ECONOMY_KEYWORDS: &[&str] = &[
    "CPI", "GDP", "通胀", "利率", "货币政策", "财政政策",
    "美联储", "央行", "宏观", "经济", "金融数据", "核心CPI",
    "关税", "美国", "中美", "贸易", "汇率", "人民币", "美元",
];

pub const INVESTMENT_STRATEGY_KEYWORDS: &[&str] = &[
    "投资策略", "投资建议", "市场展望", "配置建议", "风险提示",
    "年报", "季报", "中报", "综述", "策略", "展望", "分析",
    "周报", "月报", "跟踪", "观察",
];

/// Report cadence/type buckets, matched against titles only
pub const STRATEGY_CATEGORIES: KeywordTable = &[
    ("周报", &["周报", "周观察", "周跟踪"]),
    ("月报", &["月报", "月观察"]),
    ("季报", &["季报", "一季度", "二季度", "三季度", "四季度"]),
    ("年报", &["年报", "年度"]),
    ("专题报告", &["观察", "分析", "研究", "深度"]),
    ("行业跟踪", &["跟踪", "观点", "展望"]),
];

/// Named group of articles produced by a bucketing table
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Bucket {
    pub name: String,
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IndustryStats {
    pub count: usize,
    pub read_num: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords
        .iter()
        .any(|keyword| text.contains(&keyword.to_lowercase()))
}

/// Returns the first bucket of `table` whose keywords occur in the lowercased `text`.
pub fn classify_text(table: KeywordTable, text: &str) -> &'static str {
    table
        .iter()
        .find(|(_, keywords)| contains_any(text, keywords))
        .map(|(name, _)| *name)
        .unwrap_or(OTHER)
}

/// Industry of an article by its title and brief.
pub fn classify_industry(article: &Article) -> &'static str {
    classify_text(INDUSTRY_CATEGORIES, &article.classification_text())
}

/// Partitions `articles` by `classify` into the buckets of `table`, in table order,
/// with [`OTHER`] last. Every bucket is present even when empty.
fn bucket_by<F>(table: KeywordTable, articles: &[Article], classify: F) -> Vec<Bucket>
where
    F: Fn(&Article) -> &'static str,
{
    let mut buckets: Vec<Bucket> = table
        .iter()
        .map(|(name, _)| *name)
        .chain(std::iter::once(OTHER))
        .map(|name| Bucket {
            name: name.to_string(),
            articles: Vec::new(),
        })
        .collect();

    for article in articles {
        let name = classify(article);
        // OTHER is always the final bucket, so a miss here cannot happen.
        if let Some(bucket) = buckets.iter_mut().find(|bucket| bucket.name == name) {
            bucket.articles.push(article.clone());
        }
    }

    buckets
}

pub fn categorize_by_industry(articles: &[Article]) -> Vec<Bucket> {
    bucket_by(INDUSTRY_CATEGORIES, articles, classify_industry)
}

pub fn is_macro_economy(article: &Article) -> bool {
    contains_any(&article.classification_text(), MACRO_ECONOMY_KEYWORDS)
}

pub fn is_investment_strategy(article: &Article) -> bool {
    contains_any(&article.classification_text(), INVESTMENT_STRATEGY_KEYWORDS)
}

pub fn macro_economy_articles(articles: &[Article]) -> Vec<Article> {
    articles.iter().filter(|a| is_macro_economy(a)).cloned().collect()
}

pub fn investment_strategy_articles(articles: &[Article]) -> Vec<Article> {
    articles
        .iter()
        .filter(|a| is_investment_strategy(a))
        .cloned()
        .collect()
}

/// Up to ten macro keywords ranked by how many articles mention them.
pub fn macro_keyword_stats(articles: &[Article]) -> Vec<KeywordCount> {
    let texts: Vec<String> = articles.iter().map(Article::classification_text).collect();

    let mut counts: Vec<KeywordCount> = MACRO_ECONOMY_KEYWORDS
        .iter()
        .map(|keyword| {
            let needle = keyword.to_lowercase();
            KeywordCount {
                keyword: keyword.to_string(),
                count: texts.iter().filter(|text| text.contains(&needle)).count(),
            }
        })
        .filter(|entry| entry.count > 0)
        .collect();

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(10);
    counts
}

/// Buckets investment-strategy articles by report type using their titles.
pub fn strategy_buckets(articles: &[Article]) -> Vec<Bucket> {
    let strategy = investment_strategy_articles(articles);
    bucket_by(STRATEGY_CATEGORIES, &strategy, |article| {
        classify_text(STRATEGY_CATEGORIES, &article.title.to_lowercase())
    })
}

pub fn industry_stats(articles: &[Article]) -> Vec<(String, IndustryStats)> {
    categorize_by_industry(articles)
        .into_iter()
        .map(|bucket| {
            let stats = IndustryStats {
                count: bucket.articles.len(),
                read_num: bucket.articles.iter().map(Article::read_num).sum(),
            };
            (bucket.name, stats)
        })
        .collect()
}

fn industry_bucket(articles: &[Article], industry: &str) -> Vec<Article> {
    if industry != OTHER && !INDUSTRY_CATEGORIES.iter().any(|(name, _)| *name == industry) {
        return Vec::new();
    }
    articles
        .iter()
        .filter(|article| classify_industry(article) == industry)
        .cloned()
        .collect()
}

pub fn latest_industry_articles(articles: &[Article], industry: &str, limit: usize) -> Vec<Article> {
    let mut bucket = industry_bucket(articles, industry);
    bucket.truncate(limit);
    bucket
}

pub fn popular_industry_articles(articles: &[Article], industry: &str, limit: usize) -> Vec<Article> {
    let mut bucket: Vec<Article> = industry_bucket(articles, industry)
        .into_iter()
        .filter(|article| article.read_num() > 0)
        .collect();
    bucket.sort_by(|a, b| b.read_num().cmp(&a.read_num()));
    bucket.truncate(limit);
    bucket
}
