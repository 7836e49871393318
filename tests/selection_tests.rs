//! Integrationstests für den Selection-Manager: Buckets pro Layer,
//! Events, Stil-Wiederherstellung und Rahmen-Selektion.

use geo_feature_editor::app::{SelectionEvent, SelectionManager, SelectionMode};
use geo_feature_editor::core::{PointerEvent, StyleOverride};
use geo_feature_editor::style::{BaseStyle, Fill, StyleLayer};
use geo_feature_editor::{Extent, Feature, FeatureId, FeatureMap, Geometry, Layer, MapView};
use glam::DVec2;
use std::cell::RefCell;
use std::rc::Rc;

fn make_map() -> FeatureMap {
    let mut map = FeatureMap::new(MapView::new(DVec2::new(50.0, 50.0), 1.0, DVec2::new(100.0, 100.0)));
    map.add_layer(Layer::new("roads"));
    map.add_layer(Layer::new("trees"));
    map.add_layer(Layer::new("background").with_selectable(false));
    map.insert_feature(
        Feature::new(Geometry::LineString(vec![DVec2::new(0.0, 10.0), DVec2::new(40.0, 10.0)]))
            .with_id(FeatureId::new("roads", 1)),
    );
    map.insert_feature(
        Feature::new(Geometry::Point(DVec2::new(20.0, 80.0))).with_id(FeatureId::new("trees", 1)),
    );
    map.insert_feature(
        Feature::new(Geometry::Point(DVec2::new(80.0, 80.0))).with_id(FeatureId::new("trees", 2)),
    );
    map.insert_feature(
        Feature::new(Geometry::Point(DVec2::new(20.0, 80.0)))
            .with_id(FeatureId::new("background", 1)),
    );
    map
}

fn recorder(selection: &mut SelectionManager) -> Rc<RefCell<Vec<Vec<FeatureId>>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    selection.events.subscribe(move |event| {
        let SelectionEvent::Selected { features } = event;
        sink.borrow_mut().push(features.clone());
    });
    seen
}

fn click_at(map: &FeatureMap, coordinate: DVec2) -> PointerEvent {
    PointerEvent::new(map.view.map_to_pixel(coordinate), coordinate)
}

#[test]
fn test_selection_is_grouped_by_layer_in_insertion_order() {
    let mut map = make_map();
    let mut selection = SelectionManager::default();
    let trees_2 = FeatureId::new("trees", 2);
    let roads_1 = FeatureId::new("roads", 1);
    let trees_1 = FeatureId::new("trees", 1);

    let added = selection.select_features(
        &mut map,
        &[trees_2.clone(), roads_1.clone(), trees_1.clone()],
        false,
    );

    assert_eq!(added, 3);
    assert_eq!(selection.layers().collect::<Vec<_>>(), vec!["trees", "roads"]);
    assert_eq!(
        selection.selection(),
        vec![trees_2.clone(), trees_1, roads_1]
    );
    assert!(map.feature(&trees_2).is_some_and(Feature::is_highlighted));
}

#[test]
fn test_reselecting_is_idempotent_and_silent() {
    let mut map = make_map();
    let mut selection = SelectionManager::default();
    let seen = recorder(&mut selection);
    let id = FeatureId::new("trees", 1);

    selection.select_features(&mut map, std::slice::from_ref(&id), false);
    let added = selection.select_features(&mut map, std::slice::from_ref(&id), false);

    assert_eq!(added, 0);
    assert_eq!(selection.len(), 1);
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn test_unselect_restores_previous_instance_style() {
    let mut map = make_map();
    let mut selection = SelectionManager::default();
    let id = FeatureId::new("roads", 1);
    let own = StyleOverride::Layers(vec![StyleLayer::new(BaseStyle {
        fill: Some(Fill::new("#123456")),
        ..Default::default()
    })]);
    if let Some(feature) = map.feature_mut(&id) {
        feature.style_override = Some(own.clone());
    }

    selection.select_features(&mut map, std::slice::from_ref(&id), false);
    assert!(map.feature(&id).is_some_and(Feature::is_highlighted));

    selection.unselect_features(&mut map, std::slice::from_ref(&id));
    assert_eq!(
        map.feature(&id).and_then(|f| f.style_override.clone()),
        Some(own)
    );
    assert!(selection.is_empty());
}

#[test]
fn test_clicks_skip_non_selectable_layers_and_accumulate() {
    let mut map = make_map();
    let mut selection = SelectionManager::default();
    selection.select_by_click(&mut map);
    assert_eq!(selection.mode(), SelectionMode::Click);

    let event = click_at(&map, DVec2::new(20.0, 80.0));
    assert!(selection.handle_click(&mut map, &event));
    assert_eq!(selection.selection(), vec![FeatureId::new("trees", 1)]);

    let event = click_at(&map, DVec2::new(80.0, 80.0));
    selection.handle_click(&mut map, &event);
    assert_eq!(
        selection.selection(),
        vec![FeatureId::new("trees", 1), FeatureId::new("trees", 2)]
    );
    assert!(!map
        .feature(&FeatureId::new("background", 1))
        .is_some_and(Feature::is_highlighted));
}

#[test]
fn test_click_into_empty_space_clears_with_single_event() {
    let mut map = make_map();
    let mut selection = SelectionManager::default();
    selection.select_by_click(&mut map);
    selection.select_features(&mut map, &[FeatureId::new("trees", 1)], false);
    let seen = recorder(&mut selection);

    let event = click_at(&map, DVec2::new(60.0, 40.0));
    selection.handle_click(&mut map, &event);

    assert!(selection.is_empty());
    assert_eq!(*seen.borrow(), vec![Vec::<FeatureId>::new()]);
}

#[test]
fn test_clicks_are_ignored_while_inactive() {
    let mut map = make_map();
    let mut selection = SelectionManager::default();

    let event = click_at(&map, DVec2::new(20.0, 80.0));

    assert!(!selection.handle_click(&mut map, &event));
    assert!(selection.is_empty());
}

#[test]
fn test_window_selection_collects_intersecting_features() {
    let mut map = make_map();
    let mut selection = SelectionManager::default();
    selection.select_by_window(&mut map);

    assert!(selection.begin_box(&mut map));
    let extent = Extent::from_corners(DVec2::new(10.0, 0.0), DVec2::new(30.0, 90.0));
    assert!(selection.end_box(&mut map, &extent));

    let mut ids = selection.selection();
    ids.sort_by_key(|id| id.to_string());
    assert_eq!(ids, vec![FeatureId::new("roads", 1), FeatureId::new("trees", 1)]);
}

#[test]
fn test_deactivate_clears_and_restores_styles() {
    let mut map = make_map();
    let mut selection = SelectionManager::default();
    selection.select_by_click(&mut map);
    let id = FeatureId::new("trees", 2);
    selection.select_features(&mut map, std::slice::from_ref(&id), false);

    selection.deactivate(&mut map);

    assert!(!selection.is_active());
    assert!(selection.is_empty());
    assert_eq!(map.feature(&id).and_then(|f| f.style_override.clone()), None);
}
