use tabled::{settings::Style, Table, Tabled};

use crate::core::conversion_chain::ConversionPath;
use crate::utils::format_amount;

/// 排名表中的一行
#[derive(Clone, Debug, Tabled)]
pub struct PathRow {
    #[tabled(rename = "#")]
    pub rank: usize,
    #[tabled(rename = "Route")]
    pub route: String,
    #[tabled(rename = "Amount")]
    pub amount: String,
    #[tabled(rename = "Rate")]
    pub rate: String,
    #[tabled(rename = "Score")]
    pub score: String,
    #[tabled(rename = "Hops")]
    pub hops: usize,
}

impl PathRow {
    pub fn new(rank: usize, path: &ConversionPath) -> Self {
        Self {
            rank,
            route: path.route_label(),
            amount: format!("{} {}", format_amount(path.target_amount), path.target_currency),
            rate: format!("{:.8}", path.rate),
            score: format!("{:.8}", path.score),
            hops: path.hop_count(),
        }
    }
}

/// 渲染排名表；`details` 为真时在其后附上每条路径的逐跳明细
pub fn render_paths(paths: &[ConversionPath], details: bool) -> String {
    let mut output = format!("Found {} paths to convert\n", paths.len());
    if paths.is_empty() {
        return output;
    }

    let rows: Vec<PathRow> = paths
        .iter()
        .enumerate()
        .map(|(i, path)| PathRow::new(i + 1, path))
        .collect();
    output.push_str(&Table::new(rows).with(Style::rounded()).to_string());
    output.push('\n');

    if details {
        for (i, path) in paths.iter().enumerate() {
            output.push_str(&format!(
                "\n#{} {} ({} {} -> {} {})\n",
                i + 1,
                path.route_label(),
                format_amount(path.source_amount),
                path.source_currency,
                format_amount(path.target_amount),
                path.target_currency
            ));
            if path.hops.is_empty() {
                output.push_str("(no conversion needed)\n");
                continue;
            }
            output.push_str(&Table::new(path.hops.clone()).with(Style::rounded()).to_string());
            output.push('\n');
        }
    }
    output
}
