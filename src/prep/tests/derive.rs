use super::*;
use crate::error::PrepError;
use crate::prep::cleaning::{CleanOptions, clean_df};
use crate::prep::derive::{DeriveOptions, derive_columns};
use crate::prep::schema::{DISH_TYPE, INGREDIENT_COUNT};
use crate::prep::types::{IngredientCountMode, VegetarianFlag, VegetarianPolicy};
use anyhow::Result;

fn counts(df: &DataFrame) -> Vec<u32> {
    df.column(INGREDIENT_COUNT)
        .unwrap()
        .as_materialized_series()
        .u32()
        .unwrap()
        .into_iter()
        .flatten()
        .collect()
}

fn cleaned_df() -> DataFrame {
    clean_df(raw_df(), &CleanOptions::default()).unwrap().df
}

#[test]
fn test_end_to_end_surviving_row() -> Result<()> {
    let derived = derive_columns(&cleaned_df(), &DeriveOptions::default())?;
    let df = &derived.df;

    // Leba0n row: "a,b,c" and Vegetarian = 1
    assert_eq!(str_values(df, "Country")[0], "Lebanon");
    assert_eq!(counts(df)[0], 3);
    assert_eq!(str_values(df, DISH_TYPE)[0], "Vegetarian");
    assert_eq!(counts(df), vec![3, 2, 3, 2]);
    assert!(derived.defects.is_clean());
    Ok(())
}

#[test]
fn test_empty_ingredients_count_as_one() -> Result<()> {
    let df = df!(
        "Ingredients" => &["", "a,", " , "],
        "Vegetarian" => &["0", "0", "0"]
    )?;
    let derived = derive_columns(&df, &DeriveOptions::default())?;
    assert_eq!(counts(&derived.df), vec![1, 2, 2]);
    Ok(())
}

#[test]
fn test_non_empty_segment_mode_skips_blanks() -> Result<()> {
    let df = df!(
        "Ingredients" => &["", "a,", " , ", "rice, nori ,salt"],
        "Vegetarian" => &["0", "0", "0", "0"]
    )?;
    let options = DeriveOptions {
        ingredient_count_mode: IngredientCountMode::NonEmptySegments,
        ..Default::default()
    };
    let derived = derive_columns(&df, &options)?;
    assert_eq!(counts(&derived.df), vec![0, 1, 0, 3]);
    Ok(())
}

#[test]
fn test_description_fallback_counts_words() -> Result<()> {
    let df = df!(
        "Description" => &["Crispy  fried\tchickpea balls", "", "  one  "],
        "Vegetarian" => &["1", "1", "1"]
    )?;
    let derived = derive_columns(&df, &DeriveOptions::default())?;
    assert_eq!(counts(&derived.df), vec![4, 0, 1]);
    Ok(())
}

#[test]
fn test_ingredients_preferred_over_description() -> Result<()> {
    let df = df!(
        "Ingredients" => &["a,b"],
        "Description" => &["one two three four"],
        "Vegetarian" => &["1"]
    )?;
    let derived = derive_columns(&df, &DeriveOptions::default())?;
    assert_eq!(counts(&derived.df), vec![2]);
    Ok(())
}

#[test]
fn test_no_ingredient_source_is_an_error() {
    let df = df!("Vegetarian" => &["1"]).unwrap();
    let result = derive_columns(&df, &DeriveOptions::default());
    assert!(matches!(result, Err(PrepError::MissingColumns(_))));
}

#[test]
fn test_dish_type_is_total_under_permissive_policy() -> Result<()> {
    let df = df!(
        "Ingredients" => &["a", "b", "c", "d", "e", "f"],
        "Vegetarian" => &["1", "0", "2", "yes", "1.0", "maybe"]
    )?;
    let derived = derive_columns(&df, &DeriveOptions::default())?;

    assert_eq!(
        str_values(&derived.df, DISH_TYPE),
        vec![
            "Vegetarian",
            "Non-Vegetarian",
            "Non-Vegetarian",
            "Vegetarian",
            "Vegetarian",
            "Non-Vegetarian"
        ]
    );
    assert_eq!(derived.df.height(), 6);
    assert_eq!(derived.defects.invalid_vegetarian_flags, 2);
    assert_eq!(derived.defects.rows_removed, 0);
    Ok(())
}

#[test]
fn test_strict_policy_removes_invalid_flags() -> Result<()> {
    let df = df!(
        "Ingredients" => &["a", "b", "c"],
        "Vegetarian" => &["1", "2", "0"]
    )?;
    let options = DeriveOptions {
        vegetarian_policy: VegetarianPolicy::Strict,
        ..Default::default()
    };
    let derived = derive_columns(&df, &options)?;

    assert_eq!(derived.df.height(), 2);
    assert_eq!(
        str_values(&derived.df, DISH_TYPE),
        vec!["Vegetarian", "Non-Vegetarian"]
    );
    assert_eq!(derived.defects.invalid_vegetarian_flags, 1);
    assert_eq!(derived.defects.rows_removed, 1);
    Ok(())
}

#[test]
fn test_numeric_vegetarian_column() -> Result<()> {
    let df = df!(
        "Ingredients" => &["a", "b"],
        "Vegetarian" => &[1i64, 0]
    )?;
    let derived = derive_columns(&df, &DeriveOptions::default())?;
    assert_eq!(
        str_values(&derived.df, DISH_TYPE),
        vec!["Vegetarian", "Non-Vegetarian"]
    );
    Ok(())
}

#[test]
fn test_vegetarian_flag_parsing() {
    assert_eq!(VegetarianFlag::parse("1"), VegetarianFlag::Vegetarian);
    assert_eq!(VegetarianFlag::parse(" 0 "), VegetarianFlag::NonVegetarian);
    assert_eq!(VegetarianFlag::parse("TRUE"), VegetarianFlag::Vegetarian);
    assert_eq!(VegetarianFlag::parse("1.9"), VegetarianFlag::Vegetarian);
    assert_eq!(VegetarianFlag::parse("-0.5"), VegetarianFlag::NonVegetarian);
    assert_eq!(VegetarianFlag::parse("2"), VegetarianFlag::Invalid);
    assert_eq!(VegetarianFlag::parse(""), VegetarianFlag::Invalid);
}

#[test]
fn test_derive_does_not_touch_its_input() -> Result<()> {
    let input = cleaned_df();
    let width = input.width();
    let _derived = derive_columns(&input, &DeriveOptions::default())?;
    assert_eq!(input.width(), width);
    Ok(())
}
