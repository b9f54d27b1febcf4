// src/db/catalog_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::{AppError, translate_unique_violation};
use crate::models::catalog::{
    Category, CategoryPayload, Product, ProductDataPayload, ProductFiscalData, ProductTaxPayload,
    Unit, UnitPayload,
};

// Repositório do catálogo: categorias, unidades de medida, produtos e
// os dados fiscais de produto. Tudo escopado por company_id.
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

const CATEGORY_COLUMNS: &str =
    "id, company_id, is_active, name, slug, description, created_at, updated_at";

const UNIT_COLUMNS: &str =
    "id, company_id, is_active, name, abbreviation, created_at, updated_at";

const PRODUCT_COLUMNS: &str = "id, company_id, is_active, name, description, category_id, \
     unit_id, sku, barcode, cost_price, sale_price, stock_quantity, fiscal_data_id, \
     created_at, updated_at";

const FISCAL_COLUMNS: &str = "id, company_id, is_active, ncm, cest, cfop, origin, \
     cst_icms, cst_pis, cst_cofins, icms_aliquota, pis_aliquota, cofins_aliquota, \
     created_at, updated_at";

// Unidades de medida padrão de toda empresa nova: (nome, abreviação).
pub const DEFAULT_UNITS: &[(&str, &str)] = &[
    ("Quilograma", "kg"),
    ("Grama", "g"),
    ("Litro", "L"),
    ("Mililitro", "ml"),
    ("Unidade", "un"),
    ("Peça", "pc"),
    ("Caixa", "cx"),
    ("Pacote", "pct"),
    ("Metro", "m"),
    ("Centímetro", "cm"),
    ("Milímetro", "mm"),
    ("Tonelada", "t"),
    ("Hectolitro", "hl"),
    ("Decilitro", "dl"),
    ("Centilitro", "cl"),
    ("Par", "par"),
    ("Dúzia", "dz"),
    ("Saco", "sc"),
    ("Barril", "barril"),
    ("Rolo", "rolo"),
    ("Fardo", "fardo"),
    ("Pallet", "pallet"),
    ("Conjunto", "conj"),
    ("Kit", "kit"),
    ("Hora", "h"),
    ("Minuto", "min"),
    ("Segundo", "s"),
];

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Category
    // ---

    pub async fn create_category(
        &self,
        company_id: Uuid,
        payload: &CategoryPayload,
    ) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(&format!(
            r#"
            INSERT INTO categories (company_id, name, slug, description)
            VALUES ($1, $2, $3, $4)
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(&payload.name)
        .bind(&payload.slug)
        .bind(payload.description.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(translate_unique_violation)
    }

    pub async fn find_category(
        &self,
        company_id: Uuid,
        category_id: Uuid,
    ) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1 AND company_id = $2"
        ))
        .bind(category_id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    pub async fn list_categories(
        &self,
        company_id: Uuid,
        is_active: Option<bool>,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>(&format!(
            r#"
            SELECT {CATEGORY_COLUMNS}
            FROM categories
            WHERE company_id = $1
              AND ($2::boolean IS NULL OR is_active = $2)
              AND ($3::text IS NULL OR name ILIKE $3 OR slug ILIKE $3)
            ORDER BY name
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(company_id)
        .bind(is_active)
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn update_category(
        &self,
        company_id: Uuid,
        category_id: Uuid,
        payload: &CategoryPayload,
    ) -> Result<Option<Category>, AppError> {
        sqlx::query_as::<_, Category>(&format!(
            r#"
            UPDATE categories
            SET name = $3, slug = $4, description = $5, updated_at = NOW()
            WHERE id = $1 AND company_id = $2
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(category_id)
        .bind(company_id)
        .bind(&payload.name)
        .bind(&payload.slug)
        .bind(payload.description.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(translate_unique_violation)
    }

    // Checagem preventiva; a constraint única continua sendo a garantia final.
    pub async fn category_slug_exists(
        &self,
        company_id: Uuid,
        slug: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM categories
                WHERE company_id = $1 AND slug = $2 AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(company_id)
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn category_name_exists(
        &self,
        company_id: Uuid,
        name: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM categories
                WHERE company_id = $1 AND lower(name) = lower($2)
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(company_id)
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn set_category_active(
        &self,
        company_id: Uuid,
        category_id: Uuid,
        is_active: bool,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE categories SET is_active = $3, updated_at = NOW() WHERE id = $1 AND company_id = $2",
        )
        .bind(category_id)
        .bind(company_id)
        .bind(is_active)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---
    // Unit
    // ---

    pub async fn create_unit(
        &self,
        company_id: Uuid,
        payload: &UnitPayload,
    ) -> Result<Unit, AppError> {
        sqlx::query_as::<_, Unit>(&format!(
            r#"
            INSERT INTO units (company_id, name, abbreviation)
            VALUES ($1, $2, $3)
            RETURNING {UNIT_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(&payload.name)
        .bind(&payload.abbreviation)
        .fetch_one(&self.pool)
        .await
        .map_err(translate_unique_violation)
    }

    // Semeia as unidades padrão de uma empresa recém-criada, dentro da
    // transação do setup.
    pub async fn seed_default_units<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (names, abbreviations): (Vec<&str>, Vec<&str>) =
            DEFAULT_UNITS.iter().copied().unzip();

        sqlx::query(
            r#"
            INSERT INTO units (company_id, name, abbreviation)
            SELECT $1, unnest($2::text[]), unnest($3::text[])
            "#,
        )
        .bind(company_id)
        .bind(&names)
        .bind(&abbreviations)
        .execute(executor)
        .await
        .map_err(translate_unique_violation)?;
        Ok(())
    }

    pub async fn find_unit(
        &self,
        company_id: Uuid,
        unit_id: Uuid,
    ) -> Result<Option<Unit>, AppError> {
        let unit = sqlx::query_as::<_, Unit>(&format!(
            "SELECT {UNIT_COLUMNS} FROM units WHERE id = $1 AND company_id = $2"
        ))
        .bind(unit_id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(unit)
    }

    pub async fn list_units(
        &self,
        company_id: Uuid,
        is_active: Option<bool>,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Unit>, AppError> {
        let units = sqlx::query_as::<_, Unit>(&format!(
            r#"
            SELECT {UNIT_COLUMNS}
            FROM units
            WHERE company_id = $1
              AND ($2::boolean IS NULL OR is_active = $2)
              AND ($3::text IS NULL OR name ILIKE $3 OR abbreviation ILIKE $3)
            ORDER BY name
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(company_id)
        .bind(is_active)
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(units)
    }

    pub async fn update_unit(
        &self,
        company_id: Uuid,
        unit_id: Uuid,
        payload: &UnitPayload,
    ) -> Result<Option<Unit>, AppError> {
        sqlx::query_as::<_, Unit>(&format!(
            r#"
            UPDATE units
            SET name = $3, abbreviation = $4, updated_at = NOW()
            WHERE id = $1 AND company_id = $2
            RETURNING {UNIT_COLUMNS}
            "#
        ))
        .bind(unit_id)
        .bind(company_id)
        .bind(&payload.name)
        .bind(&payload.abbreviation)
        .fetch_optional(&self.pool)
        .await
        .map_err(translate_unique_violation)
    }

    pub async fn unit_name_exists(
        &self,
        company_id: Uuid,
        name: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM units
                WHERE company_id = $1 AND lower(name) = lower($2)
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(company_id)
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn set_unit_active(
        &self,
        company_id: Uuid,
        unit_id: Uuid,
        is_active: bool,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE units SET is_active = $3, updated_at = NOW() WHERE id = $1 AND company_id = $2",
        )
        .bind(unit_id)
        .bind(company_id)
        .bind(is_active)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---
    // Product
    // ---

    pub async fn create_product(
        &self,
        company_id: Uuid,
        payload: &ProductDataPayload,
    ) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (
                company_id, name, description, category_id, unit_id,
                sku, barcode, cost_price, sale_price, stock_quantity
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(&payload.name)
        .bind(payload.description.as_deref())
        .bind(payload.category_id)
        .bind(payload.unit_id)
        .bind(payload.sku.as_deref())
        .bind(payload.barcode.as_deref())
        .bind(payload.cost_price)
        .bind(payload.sale_price)
        .bind(payload.stock_quantity)
        .fetch_one(&self.pool)
        .await
        .map_err(translate_unique_violation)
    }

    pub async fn find_product(
        &self,
        company_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 AND company_id = $2"
        ))
        .bind(product_id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    pub async fn list_products(
        &self,
        company_id: Uuid,
        is_active: Option<bool>,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE company_id = $1
              AND ($2::boolean IS NULL OR is_active = $2)
              AND ($3::text IS NULL OR name ILIKE $3 OR sku ILIKE $3 OR barcode ILIKE $3)
            ORDER BY name
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(company_id)
        .bind(is_active)
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn update_product(
        &self,
        company_id: Uuid,
        product_id: Uuid,
        payload: &ProductDataPayload,
    ) -> Result<Option<Product>, AppError> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = $3, description = $4, category_id = $5, unit_id = $6,
                sku = $7, barcode = $8, cost_price = $9, sale_price = $10,
                stock_quantity = $11, updated_at = NOW()
            WHERE id = $1 AND company_id = $2
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(product_id)
        .bind(company_id)
        .bind(&payload.name)
        .bind(payload.description.as_deref())
        .bind(payload.category_id)
        .bind(payload.unit_id)
        .bind(payload.sku.as_deref())
        .bind(payload.barcode.as_deref())
        .bind(payload.cost_price)
        .bind(payload.sale_price)
        .bind(payload.stock_quantity)
        .fetch_optional(&self.pool)
        .await
        .map_err(translate_unique_violation)
    }

    pub async fn set_product_active(
        &self,
        company_id: Uuid,
        product_id: Uuid,
        is_active: bool,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE products SET is_active = $3, updated_at = NOW() WHERE id = $1 AND company_id = $2",
        )
        .bind(product_id)
        .bind(company_id)
        .bind(is_active)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---
    // ProductFiscalData
    // ---

    // Cria a linha fiscal e a vincula ao produto na mesma transação.
    pub async fn create_fiscal_data<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        payload: &ProductTaxPayload,
    ) -> Result<ProductFiscalData, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let fiscal = sqlx::query_as::<_, ProductFiscalData>(&format!(
            r#"
            INSERT INTO product_fiscal_data (
                company_id, ncm, cest, cfop, origin,
                cst_icms, cst_pis, cst_cofins,
                icms_aliquota, pis_aliquota, cofins_aliquota
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {FISCAL_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(&payload.ncm)
        .bind(payload.cest.as_deref())
        .bind(&payload.cfop)
        .bind(&payload.origin)
        .bind(payload.cst_icms.as_deref())
        .bind(payload.cst_pis.as_deref())
        .bind(payload.cst_cofins.as_deref())
        .bind(payload.icms_aliquota)
        .bind(payload.pis_aliquota)
        .bind(payload.cofins_aliquota)
        .fetch_one(executor)
        .await?;
        Ok(fiscal)
    }

    pub async fn update_fiscal_data<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        fiscal_data_id: Uuid,
        payload: &ProductTaxPayload,
    ) -> Result<Option<ProductFiscalData>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let fiscal = sqlx::query_as::<_, ProductFiscalData>(&format!(
            r#"
            UPDATE product_fiscal_data
            SET ncm = $3, cest = $4, cfop = $5, origin = $6,
                cst_icms = $7, cst_pis = $8, cst_cofins = $9,
                icms_aliquota = $10, pis_aliquota = $11, cofins_aliquota = $12,
                updated_at = NOW()
            WHERE id = $1 AND company_id = $2
            RETURNING {FISCAL_COLUMNS}
            "#
        ))
        .bind(fiscal_data_id)
        .bind(company_id)
        .bind(&payload.ncm)
        .bind(payload.cest.as_deref())
        .bind(&payload.cfop)
        .bind(&payload.origin)
        .bind(payload.cst_icms.as_deref())
        .bind(payload.cst_pis.as_deref())
        .bind(payload.cst_cofins.as_deref())
        .bind(payload.icms_aliquota)
        .bind(payload.pis_aliquota)
        .bind(payload.cofins_aliquota)
        .fetch_optional(executor)
        .await?;
        Ok(fiscal)
    }

    // Busca por id puro: o vínculo produto -> dados fiscais não é
    // garantido pelo banco como intra-empresa, então quem chama valida
    // o dono via TenantOwned.
    pub async fn find_fiscal_data(
        &self,
        fiscal_data_id: Uuid,
    ) -> Result<Option<ProductFiscalData>, AppError> {
        let fiscal = sqlx::query_as::<_, ProductFiscalData>(&format!(
            "SELECT {FISCAL_COLUMNS} FROM product_fiscal_data WHERE id = $1"
        ))
        .bind(fiscal_data_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(fiscal)
    }

    pub async fn link_fiscal_data<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        product_id: Uuid,
        fiscal_data_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE products SET fiscal_data_id = $3, updated_at = NOW()
            WHERE id = $1 AND company_id = $2
            "#,
        )
        .bind(product_id)
        .bind(company_id)
        .bind(fiscal_data_id)
        .execute(executor)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    // As unidades semeadas passam pela mesma constraint (company, name)
    // de qualquer unidade criada à mão; o conjunto não pode colidir.
    #[test]
    fn default_units_have_no_duplicates() {
        let names: HashSet<_> = DEFAULT_UNITS.iter().map(|(name, _)| *name).collect();
        assert_eq!(names.len(), DEFAULT_UNITS.len());

        let abbreviations: HashSet<_> =
            DEFAULT_UNITS.iter().map(|(_, abbr)| *abbr).collect();
        assert_eq!(abbreviations.len(), DEFAULT_UNITS.len());
    }

    #[test]
    fn default_units_are_well_formed() {
        assert!(!DEFAULT_UNITS.is_empty());
        for (name, abbreviation) in DEFAULT_UNITS {
            assert!(!name.is_empty());
            assert!(!abbreviation.is_empty());
        }
    }
}
