//! Prompt templates for notice analysis and document classification.

/// Prompt for extracting required documents from a bid notice.
///
/// `few_shot_block` is prepended when the example corpus found similar
/// notices; pass an empty string otherwise.
pub fn extract_bid_requirements(notice_text: &str, few_shot_block: &str) -> String {
    let examples = if few_shot_block.is_empty() {
        String::new()
    } else {
        format!("{few_shot_block}\n\n")
    };

    format!(
        r#"You are a legal document analyst specialized in Brazilian public procurement (licitações).

{examples}Analyze the following bid notice (edital) and extract ALL required documents.

For each document, identify:
1. Document name
2. Category (one of: habilitacao_juridica, regularidade_fiscal, qualificacao_tecnica, qualificacao_economica, proposta_comercial, outros)
3. Brief description
4. Any specific requirements or conditions

Bid Notice:
{notice_text}

Respond ONLY with valid JSON in this exact format:
{{
  "documents": [
    {{
      "name": "Document name",
      "category": "category_name",
      "description": "Brief description",
      "requirements": "Any specific requirements"
    }}
  ]
}}"#
    )
}

/// Prompt for classifying a company document.
pub fn classify_document(document_text: &str, filename: &str) -> String {
    // First 2000 chars are enough to identify the document type.
    let sample: String = document_text.chars().take(2000).collect();

    format!(
        r#"Classify the following Brazilian business/legal document.

Filename: {filename}

Document content:
{sample}

Determine:
1. document_type: What type of document is this? (e.g., "Certidão de Regularidade Fiscal", "Contrato Social", "CNPJ", etc.)
2. category: Which category? (habilitacao_juridica, regularidade_fiscal, qualificacao_tecnica, qualificacao_economica, proposta_comercial, outros)
3. confidence: Your confidence in this classification (0.0 to 1.0)

Respond ONLY with valid JSON:
{{
  "document_type": "type",
  "category": "category",
  "confidence": 0.0
}}"#
    )
}

/// Prompt for extracting a validity/expiration date.
pub fn extract_validity_date(document_text: &str) -> String {
    format!(
        r#"Extract the validity or expiration date from this Brazilian document.

Document:
{document_text}

Look for phrases like: "validade", "vencimento", "válido até", "vigência", etc.

Respond ONLY with valid JSON:
{{
  "has_date": true,
  "date": "YYYY-MM-DD",
  "context": "the text surrounding the date"
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirements_prompt_includes_notice() {
        let prompt = extract_bid_requirements("EDITAL 01/2025 exige contrato social", "");
        assert!(prompt.contains("EDITAL 01/2025"));
        assert!(prompt.contains("habilitacao_juridica"));
        assert!(!prompt.contains("Exemplo"));
    }

    #[test]
    fn test_requirements_prompt_with_examples() {
        let prompt = extract_bid_requirements("texto", "### Exemplo 1: Edital X");
        assert!(prompt.contains("### Exemplo 1"));
    }

    #[test]
    fn test_classify_prompt_truncates() {
        let long_text = "x".repeat(5000);
        let prompt = classify_document(&long_text, "doc.pdf");
        assert!(prompt.len() < 3500);
        assert!(prompt.contains("doc.pdf"));
    }
}
