pub mod args;
pub mod commands;
pub mod config;
pub mod logging;

pub mod data {
    pub mod collection;
}

pub mod domain {
    pub mod card;
    pub mod deck;
    pub mod deck_contents;
    pub mod grouped_card;
    pub mod placement;
}

pub mod repository {
    pub mod card_repository;
    pub mod collection_repository;
    pub mod deck_repository;
    pub mod observe;
    pub mod placement_repository;
    pub mod repository;
}

pub mod service {
    pub mod card_service;
    pub mod collection_service;
    pub mod deck_service;
    pub mod sample_data;
    pub mod service;
}

pub mod viewmodel {
    pub mod card_view_model;
    pub mod deck_view_model;
}

pub mod ui {
    pub mod forms;
    pub mod interactive;
    pub mod navigation;
    pub mod render;
}
