// src/common/validators.rs

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::common::error::AppError;
use crate::models::partners::PersonType;

// Siglas de UF aceitas no passo de endereço.
pub const VALID_UFS: [&str; 27] = [
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB",
    "PR", "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

/// Remove tudo que não é dígito (máscaras de CPF, CEP, telefone etc).
pub fn only_digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normaliza um identificador nacional: tira a máscara e exige o número
/// exato de dígitos. `None` quando o valor não bate.
pub fn digits_exact(value: &str, expected: usize) -> Option<String> {
    let digits = only_digits(value);
    if digits.len() == expected { Some(digits) } else { None }
}

fn digit_count_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

// ---
// Validações customizadas para o derive do `validator`
// ---

pub fn validate_cpf(value: &str) -> Result<(), ValidationError> {
    digits_exact(value, 11)
        .map(|_| ())
        .ok_or_else(|| digit_count_error("cpf", "CPF deve conter 11 dígitos."))
}

pub fn validate_cnpj(value: &str) -> Result<(), ValidationError> {
    digits_exact(value, 14)
        .map(|_| ())
        .ok_or_else(|| digit_count_error("cnpj", "CNPJ deve conter 14 dígitos."))
}

pub fn validate_ncm(value: &str) -> Result<(), ValidationError> {
    digits_exact(value, 8)
        .map(|_| ())
        .ok_or_else(|| digit_count_error("ncm", "NCM deve conter 8 dígitos."))
}

pub fn validate_cest(value: &str) -> Result<(), ValidationError> {
    digits_exact(value, 7)
        .map(|_| ())
        .ok_or_else(|| digit_count_error("cest", "CEST deve conter 7 dígitos."))
}

pub fn validate_cfop(value: &str) -> Result<(), ValidationError> {
    digits_exact(value, 4)
        .map(|_| ())
        .ok_or_else(|| digit_count_error("cfop", "CFOP deve conter 4 dígitos."))
}

pub fn validate_postal_code(value: &str) -> Result<(), ValidationError> {
    digits_exact(value, 8)
        .map(|_| ())
        .ok_or_else(|| digit_count_error("postal_code", "CEP deve conter 8 dígitos."))
}

pub fn validate_ibge_code(value: &str) -> Result<(), ValidationError> {
    digits_exact(value, 7)
        .map(|_| ())
        .ok_or_else(|| digit_count_error("ibge", "Código IBGE deve conter 7 dígitos."))
}

pub fn validate_uf(value: &str) -> Result<(), ValidationError> {
    let uf = value.to_uppercase();
    if VALID_UFS.contains(&uf.as_str()) {
        Ok(())
    } else {
        Err(digit_count_error(
            "uf",
            "Estado inválido. Use a sigla do estado (ex: SP, RJ).",
        ))
    }
}

pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Derivações usadas pelos serviços
// ---

/// Divide o nome completo no primeiro espaço: "Maria da Silva" vira
/// ("Maria", "da Silva").
pub fn split_full_name(full_name: &str) -> (String, String) {
    match full_name.trim().split_once(' ') {
        Some((first, last)) => (first.to_string(), last.trim().to_string()),
        None => (full_name.trim().to_string(), String::new()),
    }
}

/// Resolve o documento unificado `cpf_cnpj` a partir do tipo de pessoa:
/// PF exige CPF (11 dígitos), PJ exige CNPJ (14 dígitos).
pub fn resolve_cpf_cnpj(
    person_type: &PersonType,
    cpf: Option<&str>,
    cnpj: Option<&str>,
) -> Result<String, AppError> {
    match person_type {
        PersonType::Pf => {
            let cpf = cpf.filter(|v| !v.trim().is_empty()).ok_or_else(|| {
                AppError::field("cpf", "required", "CPF é obrigatório para pessoa física.")
            })?;
            digits_exact(cpf, 11)
                .ok_or_else(|| AppError::field("cpf", "cpf", "CPF deve conter 11 dígitos."))
        }
        PersonType::Pj => {
            let cnpj = cnpj.filter(|v| !v.trim().is_empty()).ok_or_else(|| {
                AppError::field("cnpj", "required", "CNPJ é obrigatório para pessoa jurídica.")
            })?;
            digits_exact(cnpj, 14)
                .ok_or_else(|| AppError::field("cnpj", "cnpj", "CNPJ deve conter 14 dígitos."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_masks_before_counting_digits() {
        assert_eq!(digits_exact("123.456.789-01", 11).as_deref(), Some("12345678901"));
        assert_eq!(digits_exact("01.234.567/0001-89", 14).as_deref(), Some("01234567000189"));
        assert_eq!(digits_exact("12345-678", 8).as_deref(), Some("12345678"));
        assert!(digits_exact("1234", 11).is_none());
    }

    #[test]
    fn fixed_length_validators_reject_wrong_sizes() {
        assert!(validate_cpf("12345678901").is_ok());
        assert!(validate_cpf("1234567890").is_err());
        assert!(validate_cnpj("12345678000199").is_ok());
        assert!(validate_cnpj("123").is_err());
        assert!(validate_ncm("12345678").is_ok());
        assert!(validate_ncm("1234567").is_err());
        assert!(validate_cest("1234567").is_ok());
        assert!(validate_cfop("5102").is_ok());
        assert!(validate_cfop("510").is_err());
        assert!(validate_postal_code("01310-100").is_ok());
        assert!(validate_ibge_code("3550308").is_ok());
        assert!(validate_ibge_code("35503081").is_err());
    }

    #[test]
    fn uf_accepts_known_states_case_insensitive() {
        assert!(validate_uf("SP").is_ok());
        assert!(validate_uf("rj").is_ok());
        assert!(validate_uf("XX").is_err());
    }

    #[test]
    fn money_bounds() {
        use rust_decimal::Decimal;
        assert!(validate_not_negative(&Decimal::ZERO).is_ok());
        assert!(validate_not_negative(&Decimal::new(-1, 2)).is_err());
        assert!(validate_positive(&Decimal::new(1, 2)).is_ok());
        assert!(validate_positive(&Decimal::ZERO).is_err());
    }

    #[test]
    fn splits_name_at_first_space() {
        assert_eq!(
            split_full_name("Maria da Silva"),
            ("Maria".to_string(), "da Silva".to_string())
        );
        assert_eq!(split_full_name("Maria"), ("Maria".to_string(), String::new()));
    }

    #[test]
    fn resolves_document_by_person_type() {
        let doc = resolve_cpf_cnpj(&PersonType::Pf, Some("123.456.789-01"), None).unwrap();
        assert_eq!(doc, "12345678901");

        let doc = resolve_cpf_cnpj(&PersonType::Pj, None, Some("12.345.678/0001-99")).unwrap();
        assert_eq!(doc, "12345678000199");

        // PF sem CPF é rejeitado mesmo com CNPJ presente
        assert!(resolve_cpf_cnpj(&PersonType::Pf, None, Some("12345678000199")).is_err());
        assert!(resolve_cpf_cnpj(&PersonType::Pj, Some("12345678901"), None).is_err());
    }
}
