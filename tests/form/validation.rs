use listing_engine::form::{CategoryConfig, Field, FormEngine};

fn engine(category: &str) -> FormEngine {
    FormEngine::new(CategoryConfig::resolve(category, None))
}

fn fill_common(engine: &mut FormEngine) {
    engine.set_field(Field::Title, "Corner plot near highway");
    engine.set_field(Field::Description, "East facing plot with clear title deeds");
    engine.set_field(Field::Price, "1500000");
    engine.set_field(Field::State, "1");
    engine.set_field(Field::District, "10");
    engine.set_field(Field::City, "100");
}

#[test]
fn test_plot_area_follows_length_and_breadth() {
    let mut engine = engine("lands-plots");
    engine.set_field(Field::Length, "50");
    engine.set_field(Field::Breadth, "20");
    assert_eq!(engine.value(Field::PlotArea), "1000");

    engine.set_field(Field::Breadth, "");
    assert_eq!(engine.value(Field::PlotArea), "");
}

#[test]
fn test_plot_area_not_derived_outside_lands() {
    let mut engine = engine("for-sale-houses-apartments");
    engine.set_field(Field::Length, "50");
    engine.set_field(Field::Breadth, "20");
    assert_eq!(engine.value(Field::PlotArea), "");
}

#[test]
fn test_lands_form_reports_only_its_required_fields() {
    let mut engine = engine("lands-plots");
    fill_common(&mut engine);

    let errors = engine.validate_all().unwrap_err();
    let fields: Vec<Field> = errors.keys().copied().collect();
    assert_eq!(fields, vec![Field::PlotArea, Field::Length, Field::Breadth]);
    assert!(!errors.contains_key(&Field::Bhk));

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.errors.len(), 3);
    assert_eq!(snapshot.errors.get("plotArea").map(String::as_str), Some("Plot area is required"));
    assert_eq!(snapshot.focused_field, Some(Field::PlotArea));
    assert!(snapshot.touched.contains(&Field::Length));
}

#[test]
fn test_empty_lands_form_adds_common_errors() {
    let mut engine = engine("lands-plots");
    let errors = engine.validate_all().unwrap_err();

    assert_eq!(errors.len(), 9);
    assert!(errors.keys().all(|f| f.is_common() || matches!(f, Field::PlotArea | Field::Length | Field::Breadth)));
    assert_eq!(engine.snapshot().focused_field, Some(Field::Title));
}

#[test]
fn test_complete_lands_form_passes() {
    let mut engine = engine("lands-plots");
    fill_common(&mut engine);
    engine.set_field(Field::Length, "40");
    engine.set_field(Field::Breadth, "30");

    assert!(engine.validate_all().is_ok());
    assert!(!engine.snapshot().has_errors());
}

#[test]
fn test_electronics_form_ignores_property_fields() {
    let mut engine = engine("mobile-phones");
    fill_common(&mut engine);
    engine.set_field(Field::Brand, "3");
    engine.set_field(Field::Model, "31");
    engine.set_field(Field::Condition, "used");

    assert!(engine.validate_all().is_ok());
}
