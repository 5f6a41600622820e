//! Four-stage journey narration of a parsed transaction.
//!
//! Projects a `SimplifiedTransaction` into a fixed sequence of four display
//! stages (start, action, changes, result). Each stage pairs a technical
//! description with a playful narrative line; the phrase tables are the
//! product copy, so wording changes here are user-visible.

use serde::Serialize;

use crate::types::{SimplifiedTransaction, TxCategory, TxStatus};
use crate::utils::shorten_id;

/// One stage of the journey view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyStage {
    pub stage: u8,
    pub title: String,
    pub subtitle: String,
    pub icon: String,
    pub color: String,
    pub description: String,
    pub narrative: String,
    pub details: StageDetails,
}

/// Optional per-stage payload for richer rendering.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coin_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipients: Option<Vec<String>>,
}

/// Base-unit amount (1e9 per whole coin) rendered with precision scaled to
/// magnitude: 9 decimals below 1e-6, 6 below 1, else 4.
pub fn format_amount(amount: &str) -> String {
    let num = amount.parse::<f64>().unwrap_or(0.0) / 1_000_000_000.0;
    if num < 0.000001 {
        format!("{:.9}", num)
    } else if num < 1.0 {
        format!("{:.6}", num)
    } else {
        format!("{:.4}", num)
    }
}

fn format_amount_with_coin(amount: &str, coin_type: &str) -> String {
    format!("{} {}", format_amount(amount), coin_type)
}

fn action_title(category: TxCategory) -> &'static str {
    match category {
        TxCategory::Defi => "DeFi Magic",
        TxCategory::Nft => "NFT Creation",
        TxCategory::Transfer => "Sending",
        _ => "Smart Contract",
    }
}

fn action_icon(category: TxCategory) -> &'static str {
    match category {
        TxCategory::Defi => "swap_horiz",
        TxCategory::Nft => "palette",
        TxCategory::Transfer => "send",
        _ => "auto_stories",
    }
}

fn action_narrative(category: TxCategory, main_action: &str) -> String {
    let action = main_action.to_lowercase();
    match category {
        TxCategory::Defi => {
            if action.contains("swap") {
                "🔄 Swapped some coins! Like trading cards!".to_string()
            } else if action.contains("order") {
                "📋 Placed an order! Like ordering pizza!".to_string()
            } else {
                "💱 Did some DeFi magic! Trading coins!".to_string()
            }
        }
        TxCategory::Nft => {
            if action.contains("mint") {
                "🎨 Created a new NFT! Like drawing a picture!".to_string()
            } else {
                "🖼️ Did something with an NFT! Cool art!".to_string()
            }
        }
        TxCategory::Transfer => "📦 Sent some coins to friends! Like sharing candy!".to_string(),
        _ => "⚡ Cast a smart contract spell! Magic happened!".to_string(),
    }
}

fn plural(n: usize) -> &'static str {
    if n > 1 {
        "s"
    } else {
        ""
    }
}

/// Extract the four journey stages. `move_call_count` comes from the
/// detailed projection when available, zero otherwise.
pub fn extract_stages(tx: &SimplifiedTransaction, move_call_count: usize) -> [JourneyStage; 4] {
    let category = tx.summary.category;
    let is_success = tx.status == TxStatus::Success;
    let main_coin = tx
        .balance_changes
        .first()
        .map(|c| c.coin_type.clone())
        .unwrap_or_else(|| "SUI".to_string());

    let stage1 = JourneyStage {
        stage: 1,
        title: "Your Wallet".to_string(),
        subtitle: "The Starting Point".to_string(),
        icon: "account_balance_wallet".to_string(),
        color: "comic-blue".to_string(),
        description: format!("Transaction initiated by {}", shorten_id(&tx.sender)),
        narrative: "Your wallet started the adventure! 🎒".to_string(),
        details: StageDetails {
            recipients: Some(vec![tx.sender.clone()]),
            ..Default::default()
        },
    };

    let stage2 = JourneyStage {
        stage: 2,
        title: action_title(category).to_string(),
        subtitle: tx.summary.main_action.clone(),
        icon: action_icon(category).to_string(),
        color: "comic-red".to_string(),
        description: tx.summary.description.clone(),
        narrative: action_narrative(category, &tx.summary.main_action),
        details: StageDetails {
            count: Some(move_call_count),
            ..Default::default()
        },
    };

    let created = tx.summary.objects_created;
    let mutated = tx.summary.objects_mutated;
    let (stage3_description, stage3_narrative) = if created > 0 {
        (
            format!("{} new object{} created", created, plural(created)),
            format!(
                "✨ {} new thing{} appeared! Like magic! ✨",
                created,
                plural(created)
            ),
        )
    } else if mutated > 0 {
        (
            format!("{} object{} changed", mutated, plural(mutated)),
            format!("🔄 {} thing{} got updated!", mutated, plural(mutated)),
        )
    } else {
        (
            "No objects changed".to_string(),
            "Nothing new was created, but the magic still happened! ✨".to_string(),
        )
    };
    let stage3 = JourneyStage {
        stage: 3,
        title: "Changes".to_string(),
        subtitle: if created > 0 { "New Things!" } else { "Updates!" }.to_string(),
        icon: "category".to_string(),
        color: "comic-yellow".to_string(),
        description: stage3_description,
        narrative: stage3_narrative,
        details: StageDetails {
            count: Some(created + mutated),
            ..Default::default()
        },
    };

    let (stage4_description, stage4_narrative) = if is_success {
        if !tx.recipients.is_empty() {
            let n = tx.recipients.len();
            (
                format!("Successfully sent to {} recipient{}", n, plural(n)),
                format!(
                    "🎉 Success! Your {} reached {} friend{}!",
                    main_coin,
                    n,
                    plural(n)
                ),
            )
        } else if let Some(change) = tx.balance_changes.first() {
            let rendered = format_amount_with_coin(&change.amount, &change.coin_type);
            if change.is_positive {
                (
                    format!("Received {}", rendered),
                    format!("💰 You got {}! Awesome!", rendered),
                )
            } else {
                (
                    format!("Spent {}", rendered),
                    format!("💸 You spent {}. Mission complete!", rendered),
                )
            }
        } else {
            (
                "Transaction completed successfully".to_string(),
                "🎊 Your quest is complete! Everything worked perfectly!".to_string(),
            )
        }
    } else {
        (
            "Transaction failed".to_string(),
            "😢 Oops! Something went wrong. But don't worry, you can try again!".to_string(),
        )
    };
    let stage4 = JourneyStage {
        stage: 4,
        title: if is_success { "Success!" } else { "Failed" }.to_string(),
        subtitle: format!("Gas: {} SUI", tx.gas_used.total_sui),
        icon: if is_success { "check_circle" } else { "cancel" }.to_string(),
        color: if is_success { "comic-green" } else { "red-500" }.to_string(),
        description: stage4_description,
        narrative: stage4_narrative,
        details: StageDetails {
            amount: Some(tx.gas_used.total_sui.clone()),
            coin_type: Some("SUI".to_string()),
            recipients: Some(tx.recipients.clone()),
            ..Default::default()
        },
    };

    [stage1, stage2, stage3, stage4]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BalanceChange, GasUsed, TransactionSummary};

    fn base_tx() -> SimplifiedTransaction {
        SimplifiedTransaction {
            digest: "D1".to_string(),
            status: TxStatus::Success,
            sender: "0xabcdef1234567890abcdef1234567890abcdef12".to_string(),
            recipients: vec![],
            timestamp: "Unknown".to_string(),
            balance_changes: vec![],
            gas_used: GasUsed {
                total: "2575920".to_string(),
                total_sui: "0.002576".to_string(),
            },
            summary: TransactionSummary {
                main_action: "Token Swap".to_string(),
                description: "Swapped tokens on DEX".to_string(),
                objects_created: 0,
                objects_mutated: 0,
                events_emitted: 0,
                category: TxCategory::Defi,
            },
        }
    }

    #[test]
    fn test_format_amount_tiers() {
        assert_eq!(format_amount("6523000000"), "6.5230");
        assert_eq!(format_amount("500"), "0.000000500");
        assert_eq!(format_amount("2500000"), "0.002500");
        assert_eq!(format_amount("not a number"), "0.000000000");
    }

    #[test]
    fn test_always_four_stages() {
        let stages = extract_stages(&base_tx(), 0);
        assert_eq!(stages.len(), 4);
        for (i, stage) in stages.iter().enumerate() {
            assert_eq!(stage.stage as usize, i + 1);
        }
    }

    #[test]
    fn test_stage_one_shortens_sender() {
        let stages = extract_stages(&base_tx(), 0);
        assert_eq!(
            stages[0].description,
            "Transaction initiated by 0xabcdef12...abcdef12"
        );
    }

    #[test]
    fn test_stage_two_reflects_category() {
        let stages = extract_stages(&base_tx(), 2);
        assert_eq!(stages[1].title, "DeFi Magic");
        assert_eq!(stages[1].subtitle, "Token Swap");
        assert_eq!(stages[1].icon, "swap_horiz");
        assert!(stages[1].narrative.contains("Swapped some coins"));
        assert_eq!(stages[1].details.count, Some(2));

        let mut tx = base_tx();
        tx.summary.category = TxCategory::Nft;
        tx.summary.main_action = "NFT Mint".to_string();
        let stages = extract_stages(&tx, 0);
        assert_eq!(stages[1].title, "NFT Creation");
        assert!(stages[1].narrative.contains("Created a new NFT"));
    }

    #[test]
    fn test_stage_three_created_beats_mutated() {
        let mut tx = base_tx();
        tx.summary.objects_created = 2;
        tx.summary.objects_mutated = 5;
        let stages = extract_stages(&tx, 0);
        assert_eq!(stages[2].description, "2 new objects created");
        assert_eq!(stages[2].subtitle, "New Things!");
        assert_eq!(stages[2].details.count, Some(7));

        tx.summary.objects_created = 0;
        let stages = extract_stages(&tx, 0);
        assert_eq!(stages[2].description, "5 objects changed");
        assert_eq!(stages[2].subtitle, "Updates!");

        tx.summary.objects_mutated = 0;
        let stages = extract_stages(&tx, 0);
        assert_eq!(stages[2].description, "No objects changed");
    }

    #[test]
    fn test_stage_four_recipients_take_precedence() {
        let mut tx = base_tx();
        tx.recipients = vec!["0xbbb".to_string()];
        tx.balance_changes = vec![BalanceChange {
            coin_type: "SUI".to_string(),
            amount: "6523000000".to_string(),
            is_positive: false,
            owner: "0xbbb".to_string(),
        }];
        let stages = extract_stages(&tx, 0);
        assert_eq!(stages[3].description, "Successfully sent to 1 recipient");
        assert!(stages[3].narrative.contains("reached 1 friend!"));
    }

    #[test]
    fn test_stage_four_balance_change_phrasing() {
        let mut tx = base_tx();
        tx.balance_changes = vec![BalanceChange {
            coin_type: "SUI".to_string(),
            amount: "6523000000".to_string(),
            is_positive: true,
            owner: "0xaaa".to_string(),
        }];
        let stages = extract_stages(&tx, 0);
        assert_eq!(stages[3].description, "Received 6.5230 SUI");

        tx.balance_changes[0].is_positive = false;
        let stages = extract_stages(&tx, 0);
        assert_eq!(stages[3].description, "Spent 6.5230 SUI");
    }

    #[test]
    fn test_stage_four_failure() {
        let mut tx = base_tx();
        tx.status = TxStatus::Failure;
        tx.recipients = vec!["0xbbb".to_string()];
        let stages = extract_stages(&tx, 0);
        assert_eq!(stages[3].title, "Failed");
        assert_eq!(stages[3].description, "Transaction failed");
        assert_eq!(stages[3].icon, "cancel");
        assert_eq!(stages[3].subtitle, "Gas: 0.002576 SUI");
    }
}
