use catalog_explorer::{
    normalize, CanonicalTable, ContentType, FilterCriteria, FilteredView, QueryEngine, RawRecord,
    SearchCriteria, SortKey, SortOrder,
};

fn raw(
    kind: &str,
    title: &str,
    year: Option<&str>,
    rating: &str,
    country: Option<&str>,
    genres: &str,
) -> RawRecord {
    RawRecord {
        content_type: Some(kind.to_string()),
        title: Some(title.to_string()),
        director: Some(format!("Director of {}", title)),
        release_year: year.map(str::to_string),
        rating: Some(rating.to_string()),
        country: country.map(str::to_string),
        listed_in: Some(genres.to_string()),
        ..Default::default()
    }
}

fn catalog() -> CanonicalTable {
    normalize(&[
        raw(
            "Movie",
            "The Starling",
            Some("2021"),
            "PG-13",
            Some("United States"),
            "Comedies, Dramas",
        ),
        raw(
            "TV Show",
            "Kota Factory",
            Some("2021"),
            "TV-MA",
            Some("India"),
            "International TV Shows, TV Comedies",
        ),
        raw(
            "Movie",
            "Sankofa",
            Some("1993"),
            "TV-MA",
            Some("United States, Ghana"),
            "Dramas, Independent Movies",
        ),
        raw("Movie", "Old Film", Some("2012"), "R", Some("France"), "Dramas"),
        raw("TV Show", "Mystery Show", None, "TV-14", None, "TV Mysteries"),
        raw("Movie", "Starship", Some("2016"), "PG-13", Some("Canada"), "Sci-Fi & Fantasy"),
    ])
    .unwrap()
}

fn titles(view: &FilteredView<'_>) -> Vec<String> {
    view.iter().filter_map(|r| r.title.clone()).collect()
}

#[test]
fn test_empty_criteria_returns_full_table_in_order() {
    let table = catalog();
    let engine = QueryEngine::new();

    let view = engine.filter(&table, &FilterCriteria::new());
    assert_eq!(view, FilteredView::all(&table));
    assert_eq!(view.len(), table.len());
    assert_eq!(view.records()[0].title.as_deref(), Some("The Starling"));
}

#[test]
fn test_year_range_is_inclusive_and_excludes_missing() {
    let table = catalog();
    let engine = QueryEngine::new();

    let view = engine.filter(&table, &FilterCriteria::new().with_release_years(2015, 2021));
    assert_eq!(titles(&view), vec!["The Starling", "Kota Factory", "Starship"]);
    assert!(!titles(&view).contains(&"Old Film".to_string()));
    assert!(!titles(&view).contains(&"Mystery Show".to_string()));
}

#[test]
fn test_filters_compose() {
    let table = catalog();
    let engine = QueryEngine::new();

    let by_type = FilterCriteria::new().with_types([ContentType::Movie]);
    let by_rating = FilterCriteria::new().with_ratings(["PG-13", "TV-MA"]);
    let both = FilterCriteria::new()
        .with_types([ContentType::Movie])
        .with_ratings(["PG-13", "TV-MA"]);

    let stepwise = engine.refine(&engine.filter(&table, &by_type), &by_rating);
    let reversed = engine.refine(&engine.filter(&table, &by_rating), &by_type);
    let combined = engine.filter(&table, &both);

    assert_eq!(stepwise, combined);
    assert_eq!(reversed, combined);
    assert_eq!(titles(&combined), vec!["The Starling", "Sankofa", "Starship"]);
}

#[test]
fn test_country_filter_matches_listed_entries() {
    let table = catalog();
    let engine = QueryEngine::new();

    let ghana = engine.filter(&table, &FilterCriteria::new().with_countries(["Ghana"]));
    assert_eq!(titles(&ghana), vec!["Sankofa"]);

    let nowhere = engine.filter(&table, &FilterCriteria::new().with_countries(["Atlantis"]));
    assert!(nowhere.is_empty());
}

#[test]
fn test_genre_filter_matches_primary_genre_only() {
    let table = catalog();
    let engine = QueryEngine::new();

    // "The Starling" lists Dramas second, after Comedies
    let dramas = engine.filter(&table, &FilterCriteria::new().with_genres(["Dramas"]));
    assert_eq!(titles(&dramas), vec!["Sankofa", "Old Film"]);

    let comedies = engine.filter(&table, &FilterCriteria::new().with_genres(["Comedies"]));
    assert_eq!(titles(&comedies), vec!["The Starling"]);
}

#[test]
fn test_text_search_is_case_insensitive() {
    let table = catalog();
    let engine = QueryEngine::new();
    let all = FilteredView::all(&table);

    let star = engine.search(&all, &SearchCriteria::new().with_title("STAR"));
    assert_eq!(titles(&star), vec!["The Starling", "Starship"]);

    let director = engine.search(&all, &SearchCriteria::new().with_director("of kota"));
    assert_eq!(titles(&director), vec!["Kota Factory"]);

    // No record has a cast, so any non-empty cast search matches nothing
    let cast = engine.search(&all, &SearchCriteria::new().with_cast("a"));
    assert!(cast.is_empty());
}

#[test]
fn test_empty_search_string_is_no_constraint() {
    let table = catalog();
    let engine = QueryEngine::new();
    let all = FilteredView::all(&table);

    let view = engine.search(&all, &SearchCriteria::new().with_title("").with_cast(""));
    assert_eq!(view, all);
}

#[test]
fn test_sort_is_stable_in_both_directions() {
    let table = catalog();
    let engine = QueryEngine::new();
    let all = FilteredView::all(&table);

    let by_rating = SearchCriteria::new().sorted_by(SortKey::Rating, SortOrder::Ascending);
    let asc = engine.search(&all, &by_rating);
    assert_eq!(
        titles(&asc),
        vec!["The Starling", "Starship", "Old Film", "Mystery Show", "Kota Factory", "Sankofa"]
    );

    let by_rating = SearchCriteria::new().sorted_by(SortKey::Rating, SortOrder::Descending);
    let desc = engine.search(&all, &by_rating);
    assert_eq!(
        titles(&desc),
        vec!["Kota Factory", "Sankofa", "Mystery Show", "Old Film", "The Starling", "Starship"]
    );

    let newest_first = SearchCriteria::new().sorted_by(SortKey::ReleaseYear, SortOrder::Descending);
    let by_year = engine.search(&all, &newest_first);
    assert_eq!(
        titles(&by_year),
        vec!["The Starling", "Kota Factory", "Starship", "Old Film", "Sankofa", "Mystery Show"]
    );
}

#[test]
fn test_repeated_queries_are_identical() {
    let table = catalog();
    let engine = QueryEngine::new();
    let criteria = FilterCriteria::new().with_types([ContentType::TvShow]);

    let first = engine.filter(&table, &criteria);
    let second = engine.filter(&table, &criteria);
    assert_eq!(first, second);
}
