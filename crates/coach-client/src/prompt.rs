//! Prompt builders for the two review cadences.
//!
//! The wording is part of the product: the formatting instructions pin
//! the JSON shape downstream consumers read back out of coaching
//! reports, so edits here ripple into persisted files.

use common::PeriodStats;

pub const SYSTEM_PROMPT: &str = "You are an expert trading coach with deep knowledge of prop \
     trading, risk management, and trader psychology. Provide specific, actionable advice based \
     on the data provided.";

const MONTHLY_FORMAT: &str = r#"
Please provide your analysis in the following JSON format:
{
    "overall_performance": "Brief summary of overall performance this month",
    "strengths": ["Strength 1", "Strength 2", "Strength 3"],
    "areas_for_improvement": ["Area 1", "Area 2", "Area 3"],
    "key_insights": ["Insight 1", "Insight 2", "Insight 3"],
    "actionable_recommendations": ["Recommendation 1", "Recommendation 2", "Recommendation 3"],
    "motivation_message": "Encouraging message for the trader",
    "risk_assessment": "Assessment of current risk management",
    "next_month_focus": ["Focus area 1", "Focus area 2", "Focus area 3"]
}

Focus on:
1. Risk management and position sizing
2. Win rate vs profit factor analysis
3. Trading frequency and overtrading concerns
4. Psychological aspects and discipline
5. Market conditions and adaptability
6. Commission efficiency
7. Consistency in performance

Be constructive, specific, and actionable. Avoid generic advice.
"#;

const WEEKLY_FORMAT: &str = r#"
Please provide your weekly review in JSON format:
{
    "week_summary": "Brief summary of this week's performance",
    "daily_patterns": ["Pattern 1", "Pattern 2"],
    "quick_wins": ["Quick improvement 1", "Quick improvement 2"],
    "warning_signs": ["Warning 1", "Warning 2"],
    "focus_for_next_week": ["Focus 1", "Focus 2", "Focus 3"],
    "motivation_boost": "Short encouraging message",
    "tactical_adjustments": ["Adjustment 1", "Adjustment 2"]
}

Focus on:
1. Daily trading patterns and consistency
2. Intraweek momentum and psychology
3. Quick tactical adjustments
4. Risk management on a weekly basis
5. Energy and focus levels
6. Market adaptation during the week

Keep it concise and focused on immediate actionable items.
"#;

fn plus_if_non_negative(value: f64) -> &'static str {
    if value >= 0.0 {
        "+"
    } else {
        ""
    }
}

fn top_symbols(stats: &PeriodStats) -> String {
    stats
        .symbols
        .iter()
        .take(5)
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Deep-dive review of one month, with a month-over-month comparison
/// when the prior month's export exists.
pub fn monthly_prompt(current: &PeriodStats, previous: Option<&PeriodStats>) -> String {
    let mut prompt = format!(
        "\nYou are an experienced trading coach analyzing a prop trader's monthly performance. \n\
         Please provide constructive feedback, insights, and actionable recommendations.\n\
         \n\
         CURRENT MONTH PERFORMANCE:\n\
         - Total Trades: {}\n\
         - Total P&L: ${:.2}\n\
         - Win Rate: {:.1}%\n\
         - Best Day P&L: ${:.2}\n\
         - Worst Day P&L: ${:.2}\n\
         - Trading Days: {}\n\
         - Average P&L per Trade: ${:.2}\n\
         - Total Commission: ${:.2}\n\
         - Most Traded Symbols: {}\n",
        current.total_trades,
        current.total_pnl,
        current.win_rate,
        current.best_day_pnl,
        current.worst_day_pnl,
        current.trading_days,
        current.avg_pnl_per_trade,
        current.total_commissions,
        top_symbols(current),
    );

    if let Some(prev) = previous {
        let pnl_change = current.total_pnl - prev.total_pnl;
        let winrate_change = current.win_rate - prev.win_rate;
        let trades_change = current.total_trades as i64 - prev.total_trades as i64;
        let trades_sign = if trades_change >= 0 { "+" } else { "" };

        prompt.push_str(&format!(
            "\nCOMPARISON WITH PREVIOUS MONTH:\n\
             - P&L Change: ${:.2} ({}{:.2})\n\
             - Win Rate Change: {:.1}% ({}{:.1}%)\n\
             - Trade Volume Change: {} trades ({}{})\n\
             - Previous Month P&L: ${:.2}\n\
             - Previous Month Win Rate: {:.1}%\n",
            pnl_change,
            plus_if_non_negative(pnl_change),
            pnl_change,
            winrate_change,
            plus_if_non_negative(winrate_change),
            winrate_change,
            trades_change,
            trades_sign,
            trades_change,
            prev.total_pnl,
            prev.win_rate,
        ));
    }

    prompt.push_str(MONTHLY_FORMAT);
    prompt
}

/// Tactical review of one week against the trailing weeks.
pub fn weekly_prompt(current: &PeriodStats, recent: &[PeriodStats]) -> String {
    let mut prompt = format!(
        "\nYou are an experienced trading coach providing weekly performance review for a prop trader.\n\
         Focus on immediate tactical improvements and weekly patterns.\n\
         \n\
         CURRENT WEEK PERFORMANCE:\n\
         - Total Trades: {}\n\
         - Total P&L: ${:.2}\n\
         - Win Rate: {:.1}%\n\
         - Trading Days: {}\n\
         - Best Day: ${:.2}\n\
         - Worst Day: ${:.2}\n\
         - Daily Consistency: {}\n",
        current.total_trades,
        current.total_pnl,
        current.win_rate,
        current.trading_days,
        current.best_day_pnl,
        current.worst_day_pnl,
        current.consistency,
    );

    if !recent.is_empty() {
        let count = recent.len() as f64;
        let avg_pnl = recent.iter().map(|w| w.total_pnl).sum::<f64>() / count;
        let avg_winrate = recent.iter().map(|w| w.win_rate).sum::<f64>() / count;
        let versus = if current.total_pnl > avg_pnl {
            "Above"
        } else {
            "Below"
        };

        prompt.push_str(&format!(
            "\nRECENT WEEKS COMPARISON:\n\
             - Average P&L (last 4 weeks): ${:.2}\n\
             - Average Win Rate (last 4 weeks): {:.1}%\n\
             - This week vs average: {} average\n",
            avg_pnl, avg_winrate, versus,
        ));
    }

    prompt.push_str(WEEKLY_FORMAT);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_stats(total_pnl: f64, win_rate: f64, total_trades: usize) -> PeriodStats {
        PeriodStats {
            total_trades,
            total_pnl,
            win_rate,
            consistency: "60% positive days".to_string(),
            symbols: vec![
                "AAPL".into(),
                "AMD".into(),
                "MSFT".into(),
                "NVDA".into(),
                "SPY".into(),
                "TSLA".into(),
            ],
            ..PeriodStats::default()
        }
    }

    #[test]
    fn test_monthly_prompt_without_history() {
        let prompt = monthly_prompt(&make_stats(1250.5, 58.3, 140), None);
        assert!(prompt.contains("CURRENT MONTH PERFORMANCE:"));
        assert!(prompt.contains("- Total Trades: 140"));
        assert!(prompt.contains("- Total P&L: $1250.50"));
        assert!(prompt.contains("- Win Rate: 58.3%"));
        assert!(!prompt.contains("COMPARISON WITH PREVIOUS MONTH"));
        assert!(prompt.contains("\"next_month_focus\""));
    }

    #[test]
    fn test_monthly_prompt_with_history() {
        let current = make_stats(1000.0, 55.0, 120);
        let previous = make_stats(1200.0, 50.0, 100);
        let prompt = monthly_prompt(&current, Some(&previous));

        assert!(prompt.contains("COMPARISON WITH PREVIOUS MONTH:"));
        // a losing month carries its own minus, no plus prefix
        assert!(prompt.contains("- P&L Change: $-200.00 (-200.00)"));
        assert!(prompt.contains("- Win Rate Change: 5.0% (+5.0%)"));
        assert!(prompt.contains("- Trade Volume Change: 20 trades (+20)"));
        assert!(prompt.contains("- Previous Month P&L: $1200.00"));
    }

    #[test]
    fn test_top_symbols_truncated_to_five() {
        let prompt = monthly_prompt(&make_stats(0.0, 0.0, 0), None);
        assert!(prompt.contains("- Most Traded Symbols: AAPL, AMD, MSFT, NVDA, SPY\n"));
        assert!(!prompt.contains("TSLA"));
    }

    #[test]
    fn test_weekly_prompt_without_history() {
        let prompt = weekly_prompt(&make_stats(300.0, 62.0, 40), &[]);
        assert!(prompt.contains("CURRENT WEEK PERFORMANCE:"));
        assert!(prompt.contains("- Daily Consistency: 60% positive days"));
        assert!(!prompt.contains("RECENT WEEKS COMPARISON"));
        assert!(prompt.contains("\"focus_for_next_week\""));
    }

    #[test]
    fn test_weekly_prompt_versus_average() {
        let current = make_stats(500.0, 60.0, 40);
        let recent = vec![make_stats(100.0, 50.0, 30), make_stats(200.0, 55.0, 35)];
        let prompt = weekly_prompt(&current, &recent);

        assert!(prompt.contains("- Average P&L (last 4 weeks): $150.00"));
        assert!(prompt.contains("- Average Win Rate (last 4 weeks): 52.5%"));
        assert!(prompt.contains("- This week vs average: Above average"));

        let losing = make_stats(50.0, 40.0, 20);
        let prompt = weekly_prompt(&losing, &recent);
        assert!(prompt.contains("- This week vs average: Below average"));
    }
}
