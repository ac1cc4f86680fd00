//! Search query templates.

/// The three searches run per refresh, in fetch order: severe weather,
/// general farming, then government schemes. Each is scoped to `term`.
pub fn build_queries(term: &str) -> [String; 3] {
    [
        format!(
            "(storm OR cyclone OR hurricane OR flood OR drought OR \"heavy rain\" OR \"extreme weather\") AND ({}) AND (agriculture OR farming OR crops)",
            term
        ),
        format!(
            "(agriculture OR farming OR crops OR harvest OR \"crop yield\" OR irrigation OR pesticide) AND ({})",
            term
        ),
        format!(
            "(\"government scheme\" OR subsidy OR \"farm policy\" OR \"agricultural loan\") AND ({})",
            term
        ),
    ]
}
