use anyhow::Result;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait};
use uuid::Uuid;

use crate::{brand, category, product, Resource};

#[tokio::test]
async fn test_catalog_chain_crud() -> Result<()> {
    let Some(db) = super::live_db().await else { return Ok(()) };
    let tag = Uuid::new_v4().simple().to_string();

    let cat = <category::Entity as Resource>::build(category::NewCategory {
        parent_id: None,
        name: format!("Whole Spices {tag}"),
        slug: None,
        description: None,
        image_url: None,
        sort_order: 0,
        is_active: true,
    })?
    .insert(&db)
    .await?;
    assert_eq!(cat.slug, format!("whole-spices-{tag}"));

    let br = <brand::Entity as Resource>::build(brand::NewBrand {
        name: format!("Malabar {tag}"),
        slug: None,
        description: None,
        logo_url: None,
        is_active: true,
    })?
    .insert(&db)
    .await?;

    let prod = <product::Entity as Resource>::build(product::NewProduct {
        category_id: cat.id,
        brand_id: Some(br.id),
        name: format!("Black Pepper {tag}"),
        slug: None,
        description: Some("Tellicherry extra bold".into()),
        hsn_code: Some("0904".into()),
        gst_rate: Decimal::new(5, 0),
        image_url: None,
        is_featured: true,
        is_active: true,
    })?
    .insert(&db)
    .await?;

    let patched = <product::Entity as Resource>::patch(
        prod.clone(),
        product::ProductPatch { is_featured: Some(false), ..Default::default() },
    )?
    .update(&db)
    .await?;
    assert!(!patched.is_featured);
    assert!(patched.modified_date >= prod.modified_date);

    let retired = <product::Entity as Resource>::retire(patched).expect("soft delete");
    let retired = retired.update(&db).await?;
    assert!(retired.is_deleted);

    product::Entity::delete_by_id(prod.id).exec(&db).await?;
    brand::Entity::delete_by_id(br.id).exec(&db).await?;
    category::Entity::delete_by_id(cat.id).exec(&db).await?;
    Ok(())
}
