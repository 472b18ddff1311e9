/*!
 * Prompt construction for the proofreading service.
 *
 * Blocks are sent as a numbered list so the service can refer back to them by
 * number in its result table.
 */

use crate::script::AiBlock;

/// Proofreading prompt template.
///
/// `{blocks}` is replaced with the numbered block list.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Default proofreading instructions, including the result table shape
    /// and the no-issues sentinel the mapper looks for
    pub const PROOFREADER: &'static str = r#"あなたはプロの校正者です。以下のナレーション原稿の誤字脱字をチェックし、修正案を提示してください。

# 制約条件
- ナレーション特有の句読点やスペースは修正しない。
- 芸能人の名前は正しく校正する。
- 文末が不自然でも、意図的なものとして修正しない。
- 漢数字は使用せず、算用数字のままにする。
- 誤りがない場合は「問題ありませんでした。」とだけ出力する。

# 出力形式
- 誤りがある場合のみ、以下のMarkdownテーブル形式で出力する。
- 「No.」列には必ず元の番号を入れる。
- 「修正提案」列で誤字脱字を指摘する時は「○○ → △△」のようにどう間違ってるか明確に記載。
- 「理由」列は「〇〇の誤り」、「〇〇では？」のように簡潔に記載する。

【出力形式】
| No. | 修正提案 | 理由 |
|---|---|---|
| (番号) | (正しい単語・フレーズ) | (修正理由) |

【ナレーション原稿】
---
{blocks}
---"#;

    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Render the template around the given blocks
    pub fn render(&self, blocks: &[AiBlock]) -> String {
        self.template.replace("{blocks}", &number_blocks(blocks))
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(Self::PROOFREADER)
    }
}

/// `No.1: text` lines, numbered from one
pub fn number_blocks(blocks: &[AiBlock]) -> String {
    blocks
        .iter()
        .enumerate()
        .map(|(i, block)| format!("No.{}: {}", i + 1, block.text))
        .collect::<Vec<_>>()
        .join("\n")
}
