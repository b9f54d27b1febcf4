// src/common/i18n.rs

/// Catálogo de mensagens da API. O idioma vem do `Accept-Language` do
/// cliente (extrator `Locale`); qualquer idioma fora de "pt" cai em inglês.
pub fn message(lang: &str, key: &str) -> &'static str {
    let pt = lang.starts_with("pt");
    match key {
        "validation" => {
            if pt {
                "Um ou mais campos são inválidos."
            } else {
                "One or more fields are invalid."
            }
        }
        "email_exists" => {
            if pt {
                "Este e-mail já está em uso."
            } else {
                "This e-mail is already in use."
            }
        }
        "invalid_credentials" => {
            if pt {
                "E-mail ou senha inválidos."
            } else {
                "Invalid e-mail or password."
            }
        }
        "invalid_token" => {
            if pt {
                "Token de autenticação inválido ou ausente."
            } else {
                "Invalid or missing authentication token."
            }
        }
        "user_not_found" => {
            if pt {
                "Usuário não encontrado."
            } else {
                "User not found."
            }
        }
        "not_found" => {
            if pt {
                "Registro não encontrado."
            } else {
                "Record not found."
            }
        }
        "company_context_missing" => {
            if pt {
                "Nenhuma empresa ativa selecionada."
            } else {
                "No active company selected."
            }
        }
        "permission_denied" => {
            if pt {
                "Você precisa da permissão"
            } else {
                "You need the permission"
            }
        }
        "membership_exists" => {
            if pt {
                "Já existe um usuário com este e-mail nesta empresa."
            } else {
                "A user with this e-mail already exists in this company."
            }
        }
        "document_exists" => {
            if pt {
                "Já existe um parceiro com este CPF/CNPJ nesta empresa."
            } else {
                "A partner with this CPF/CNPJ already exists in this company."
            }
        }
        "cnpj_exists" => {
            if pt {
                "Este CNPJ já está cadastrado."
            } else {
                "This CNPJ is already registered."
            }
        }
        "slug_exists" => {
            if pt {
                "Já existe um registro com este slug."
            } else {
                "A record with this slug already exists."
            }
        }
        "name_exists" => {
            if pt {
                "Já existe um registro com este nome nesta empresa."
            } else {
                "A record with this name already exists in this company."
            }
        }
        "unique_violation" => {
            if pt {
                "Registro duplicado."
            } else {
                "Duplicate record."
            }
        }
        _ => {
            if pt {
                "Ocorreu um erro inesperado."
            } else {
                "An unexpected error occurred."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::message;

    #[test]
    fn resolves_portuguese_and_english() {
        assert_eq!(message("pt", "validation"), "Um ou mais campos são inválidos.");
        assert_eq!(message("pt-BR", "validation"), "Um ou mais campos são inválidos.");
        assert_eq!(message("en", "validation"), "One or more fields are invalid.");
    }

    #[test]
    fn unknown_key_falls_back_to_generic() {
        assert_eq!(message("en", "???"), "An unexpected error occurred.");
    }
}
