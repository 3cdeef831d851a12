//! End-to-end compliance run: notice text → requirements, document files →
//! classified documents, both → compliance report.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use licita_classify::DocumentClassifier;
use licita_match::{Comparator, MatchStatus};
use licita_notice::NoticeReader;

const MAX_SIZE: u64 = 50 * 1024 * 1024;

const NOTICE: &str = "EDITAL DE PREGÃO ELETRÔNICO 01/2025\n\
    Para habilitação, o licitante deverá apresentar:\n\
    a) contrato social e suas alterações;\n\
    b) prova de inscrição no CNPJ;\n\
    c) certidão negativa de débitos relativos aos tributos federais;\n\
    d) prova de regularidade FGTS;\n\
    e) certidão de falência expedida pelo distribuidor da sede;\n\
    f) atestado de capacidade técnica;\n\
    g) balanço patrimonial do último exercício social.";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
}

fn write_doc(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

fn company_documents(dir: &Path) -> Vec<PathBuf> {
    vec![
        write_doc(
            dir,
            "contrato_social.txt",
            "Contrato social da empresa Exemplo Ltda, registrado na junta comercial, \
             com capital social integralizado.",
        ),
        write_doc(
            dir,
            "comprovante_cnpj.txt",
            "Comprovante de inscrição e de situação cadastral no CNPJ, cadastro nacional \
             da pessoa juridica, emitido pela Receita Federal.",
        ),
        write_doc(
            dir,
            "cnd_federal.txt",
            "Certidão negativa de débitos relativos aos tributos federais, emitida pela \
             Procuradoria-Geral da Fazenda Nacional. VALIDADE: 15/06/2025.",
        ),
        write_doc(
            dir,
            "cnd_fgts.txt",
            "Certificado de regularidade do FGTS - CRF, emitido pela Caixa. \
             Validade: 20/02/2025.",
        ),
        write_doc(
            dir,
            "certidao_falencia.txt",
            "Certidão negativa de falência e concordata, emitida em 20/12/2024 pelo \
             distribuidor judicial da comarca.",
        ),
        write_doc(
            dir,
            "extrato_bancario.txt",
            "Extrato de movimentação bancária da conta corrente no período de dezembro.",
        ),
    ]
}

#[test]
fn test_full_compliance_run() {
    let dir = tempfile::tempdir().unwrap();
    let paths = company_documents(dir.path());

    let reader = NoticeReader::new();
    let requirements = reader.extract(NOTICE);
    assert!(requirements.len() >= 6);

    let classifier = DocumentClassifier::new(MAX_SIZE);
    let outcome = classifier.classify_batch(&paths, today());
    assert_eq!(outcome.documents.len(), 6);
    assert!(outcome.failures.is_empty());

    let report = Comparator::default().compare(&requirements, &outcome.documents);

    // Partition property: every document matched once or unmatched.
    assert_eq!(
        report.statistics.documents_matched + report.statistics.documents_unmatched,
        report.statistics.total_documents
    );
    assert_eq!(
        report.statistics.total_requirements,
        report.matches.len()
    );

    // The bank statement matches nothing.
    assert!(report
        .unmatched_documents
        .iter()
        .any(|d| d.file_name == "extrato_bancario.txt"));

    // The federal certificate requirement found its document.
    let federal = report
        .matches
        .iter()
        .find(|m| m.requirement.name == "Certidão Negativa")
        .expect("requirement extracted from notice");
    if let Some(document) = &federal.matched_document {
        assert_eq!(document.file_name, "cnd_federal.txt");
    }
}

#[test]
fn test_missing_invariant_holds_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let paths = company_documents(dir.path());

    let reader = NoticeReader::new();
    let requirements = reader.extract(NOTICE);

    let classifier = DocumentClassifier::new(MAX_SIZE);
    let outcome = classifier.classify_batch(&paths, today());

    let report = Comparator::default().compare(&requirements, &outcome.documents);
    for m in &report.matches {
        if m.matched_document.is_none() {
            assert_eq!(m.status, MatchStatus::Missing);
            assert_eq!(m.match_confidence, 0.0);
        }
    }
}

#[test]
fn test_issuance_window_drives_expiry_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_doc(
        dir.path(),
        "certidao_falencia.txt",
        "Certidão negativa de falência, emitida em 01/01/2025 pelo distribuidor.",
    );

    let classifier = DocumentClassifier::new(MAX_SIZE);

    // Inside the 90-day window: valid.
    let doc = classifier.classify(&path, today()).unwrap();
    assert!(!doc.is_expired);

    // Past the window: expired, and a matching requirement reports it.
    let late = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let doc = classifier.classify(&path, late).unwrap();
    assert!(doc.is_expired);

    let requirements = NoticeReader::new().extract("exige-se certidão de falência do licitante");
    assert!(!requirements.is_empty());
    let report = Comparator::default().compare(&requirements, &[doc]);
    let m = &report.matches[0];
    if m.matched_document.is_some() {
        assert_eq!(m.status, MatchStatus::Expired);
    }
}

#[test]
fn test_report_is_idempotent_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let paths = company_documents(dir.path());

    let requirements = NoticeReader::new().extract(NOTICE);
    let outcome = DocumentClassifier::new(MAX_SIZE).classify_batch(&paths, today());

    let comparator = Comparator::default();
    let first = comparator.compare(&requirements, &outcome.documents);
    let second = comparator.compare(&requirements, &outcome.documents);

    assert_eq!(
        first.statistics.requirements_ok,
        second.statistics.requirements_ok
    );
    assert_eq!(
        first.statistics.requirements_missing,
        second.statistics.requirements_missing
    );
    assert_eq!(
        first.statistics.documents_unmatched,
        second.statistics.documents_unmatched
    );
}
