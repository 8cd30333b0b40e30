use std::io::{self, IsTerminal};

use anyhow::bail;
use dialoguer::{Confirm, Input, Select};

use crate::{
    domain::{
        card::{Card, Rarity},
        deck::DeckType,
    },
    service::{
        deck_service::MAX_COPIES_PER_ADD,
        service::{Service, ServiceError},
    },
    viewmodel::{card_view_model::CardListViewModel, deck_view_model::DeckListViewModel},
};

use super::{
    forms::{AddCardToDeckForm, CardForm, ConfirmUpdate, DeckForm, UpdateDecision},
    navigation::Screen,
    render,
};

pub async fn run(service: &Service) -> anyhow::Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        bail!("interactive mode requires a TTY");
    }

    let mut cards = CardListViewModel::load(service).await?;
    let mut decks = DeckListViewModel::load(service).await?;
    let mut screen = Screen::START;

    loop {
        println!("\n== {} ==", screen.title());
        let next = match screen {
            Screen::Menu => menu()?,
            Screen::CardList => card_list_screen(&mut cards).await?,
            Screen::DeckList => deck_list_screen(&mut decks).await?,
            Screen::DeckDetail(id) => deck_detail_screen(&mut decks, &mut cards, id).await?,
        };
        match next {
            Some(next) => {
                tracing::debug!(from = %screen, to = %next, "navigate");
                screen = next;
            }
            None => break,
        }
    }
    Ok(())
}

fn menu() -> anyhow::Result<Option<Screen>> {
    let choice = Select::new()
        .items(&["Decks", "Cards", "Quit"])
        .default(0)
        .interact_opt()?;
    Ok(match choice {
        Some(0) => Some(Screen::DeckList),
        Some(1) => Some(Screen::CardList),
        _ => None,
    })
}

/// Prints service errors and keeps the session going.
fn report(result: Result<(), ServiceError>) {
    if let Err(err) = result {
        println!("! {err}");
    }
}

fn pick<T>(prompt: &str, items: &[T], label: impl Fn(&T) -> String) -> anyhow::Result<Option<usize>> {
    if items.is_empty() {
        println!("Nothing to choose from.");
        return Ok(None);
    }
    let labels: Vec<String> = items.iter().map(label).collect();
    Ok(Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact_opt()?)
}

fn text(prompt: &str, initial: &str) -> anyhow::Result<String> {
    Ok(Input::<String>::new()
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()?)
}

fn prompt_card_form(mut form: CardForm) -> anyhow::Result<CardForm> {
    form.name = text("Name", &form.name)?;
    form.cost = text("Cost", &form.cost)?;
    form.attack = text("Attack", &form.attack)?;
    form.defense = text("Defense", &form.defense)?;
    let current = Rarity::ALL.iter().position(|r| *r == form.rarity).unwrap_or(0);
    let rarity = Select::new()
        .with_prompt("Rarity")
        .items(&Rarity::ALL.map(|r| r.to_string()))
        .default(current)
        .interact()?;
    form.rarity = Rarity::ALL[rarity];
    form.location = text("Storage location", &form.location)?;
    form.memo = text("Memo", &form.memo)?;
    Ok(form)
}

fn prompt_deck_form(mut form: DeckForm) -> anyhow::Result<DeckForm> {
    form.name = text("Name", &form.name)?;
    form.description = text("Description", &form.description)?;
    let current = DeckType::ALL
        .iter()
        .position(|t| *t == form.deck_type)
        .unwrap_or(0);
    let deck_type = Select::new()
        .with_prompt("Deck type")
        .items(&DeckType::ALL.map(|t| t.to_string()))
        .default(current)
        .interact()?;
    form.deck_type = DeckType::ALL[deck_type];
    Ok(form)
}

fn confirm_update() -> anyhow::Result<ConfirmUpdate> {
    let answer = Select::new()
        .with_prompt("Apply these changes?")
        .items(&ConfirmUpdate::ALL.map(|c| c.label()))
        .default(0)
        .interact_opt()?;
    Ok(answer.map_or(ConfirmUpdate::Cancel, |i| ConfirmUpdate::ALL[i]))
}

async fn card_list_screen(vm: &mut CardListViewModel<'_>) -> anyhow::Result<Option<Screen>> {
    report(vm.refresh().await);
    print!("{}", render::card_list(vm.cards()));
    let action = Select::new()
        .items(&["Add card", "Edit card", "Delete card", "Show grouped", "Back"])
        .default(0)
        .interact_opt()?;

    match action {
        Some(0) => {
            vm.show_add_dialog();
            let form = prompt_card_form(CardForm::default())?;
            match form.to_new_card() {
                Some(card) => report(vm.add_card(card).await.map(|_| ())),
                None => {
                    println!("A card needs a name.");
                    vm.hide_add_dialog();
                }
            }
        }
        Some(1) => {
            let Some(index) = pick("Card to edit", vm.cards(), render::card_line)? else {
                return Ok(Some(Screen::CardList));
            };
            let card = vm.cards()[index].clone();
            vm.show_edit_dialog(card.clone());
            let mut form = CardForm::from_card(&card);
            loop {
                form = prompt_card_form(form)?;
                match confirm_update()?.resolve(form.apply_to(&card)) {
                    UpdateDecision::Apply(updated) => {
                        report(vm.update_card(updated).await);
                        break;
                    }
                    UpdateDecision::Discard => {
                        vm.hide_edit_dialog();
                        break;
                    }
                    UpdateDecision::KeepEditing => continue,
                }
            }
        }
        Some(2) => {
            let Some(index) = pick("Card to delete", vm.cards(), render::card_line)? else {
                return Ok(Some(Screen::CardList));
            };
            let card = vm.cards()[index].clone();
            let prompt = format!("Delete \"{}\"?", card.name);
            vm.show_delete_dialog(card);
            if Confirm::new().with_prompt(prompt).default(false).interact()? {
                report(vm.delete_card().await);
            } else {
                vm.hide_delete_dialog();
            }
        }
        Some(3) => match vm.grouped().await {
            Ok(groups) => print!("{}", render::grouped_list(&groups)),
            Err(err) => println!("! {err}"),
        },
        _ => return Ok(Screen::CardList.parent()),
    }
    Ok(Some(Screen::CardList))
}

async fn deck_list_screen(vm: &mut DeckListViewModel<'_>) -> anyhow::Result<Option<Screen>> {
    report(vm.refresh().await);
    print!("{}", render::deck_list(vm.decks()));
    let action = Select::new()
        .items(&["Open deck", "Add deck", "Edit deck", "Delete deck", "Back"])
        .default(0)
        .interact_opt()?;

    match action {
        Some(0) => {
            if let Some(index) = pick("Deck", vm.decks(), render::deck_line)? {
                return Ok(Some(Screen::DeckDetail(vm.decks()[index].id)));
            }
        }
        Some(1) => {
            vm.show_add_dialog();
            match prompt_deck_form(DeckForm::default())?.to_new_deck() {
                Some(deck) => report(vm.add_deck(deck).await.map(|_| ())),
                None => {
                    println!("A deck needs a name.");
                    vm.hide_add_dialog();
                }
            }
        }
        Some(2) => {
            if let Some(index) = pick("Deck to edit", vm.decks(), render::deck_line)? {
                let deck = vm.decks()[index].clone();
                vm.show_edit_dialog(deck.clone());
                match prompt_deck_form(DeckForm::from_deck(&deck))?.apply_to(&deck) {
                    Some(updated) => report(vm.update_deck(updated).await),
                    None => {
                        println!("A deck needs a name.");
                        vm.hide_edit_dialog();
                    }
                }
            }
        }
        Some(3) => {
            if let Some(index) = pick("Deck to delete", vm.decks(), render::deck_line)? {
                let deck = vm.decks()[index].clone();
                let prompt = format!("Delete \"{}\"?", deck.name);
                vm.show_delete_dialog(deck);
                if Confirm::new().with_prompt(prompt).default(false).interact()? {
                    report(vm.delete_deck().await);
                } else {
                    vm.hide_delete_dialog();
                }
            }
        }
        _ => return Ok(Screen::DeckList.parent()),
    }
    Ok(Some(Screen::DeckList))
}

async fn deck_detail_screen(
    decks: &mut DeckListViewModel<'_>,
    cards: &mut CardListViewModel<'_>,
    deck_id: i64,
) -> anyhow::Result<Option<Screen>> {
    let here = Screen::DeckDetail(deck_id);
    let loaded = if decks.selected_id() == Some(deck_id) {
        decks.refresh().await
    } else {
        decks.select_deck(deck_id).await
    };
    if let Err(err) = loaded {
        println!("! {err}");
        return Ok(here.parent());
    }
    let Some(contents) = decks.selected().cloned() else {
        return Ok(here.parent());
    };
    print!("{}", render::deck_detail(&contents));

    let action = Select::new()
        .items(&["Add card", "Remove one copy", "Remove all copies", "Back"])
        .default(0)
        .interact_opt()?;

    match action {
        Some(0) => {
            report(cards.refresh().await);
            decks.show_add_card_dialog();
            let in_deck = decks.selected_card_ids().await.unwrap_or_default();
            let label = |card: &Card| {
                let line = render::card_line(card);
                if in_deck.contains(&card.id) {
                    format!("{line}  (in deck)")
                } else {
                    line
                }
            };
            let Some(index) = pick("Card to add", cards.cards(), label)? else {
                decks.hide_add_card_dialog();
                return Ok(Some(here));
            };
            let mut form = AddCardToDeckForm::for_card(cards.cards()[index].id);
            let copies: Vec<String> = (1..=MAX_COPIES_PER_ADD).map(|n| n.to_string()).collect();
            let wanted = Select::new()
                .with_prompt("How many copies?")
                .items(&copies)
                .default(0)
                .interact()?
                + 1;
            while form.copies() < wanted && form.can_increment() {
                form.increment();
            }
            for index in 0..form.copies() {
                let location = text(&format!("Storage location of copy {}", index + 1), "")?;
                form.set_location(index, location);
            }
            match form.submit() {
                Some((card_id, locations)) => {
                    report(decks.add_card_to_deck(card_id, locations).await)
                }
                None => decks.hide_add_card_dialog(),
            }
        }
        Some(action @ (1 | 2)) => {
            let placed: Vec<_> = contents.cards.iter().map(|(card, _)| card.clone()).collect();
            if let Some(index) = pick("Card", &placed, render::card_line)? {
                let card_id = placed[index].id;
                if action == 1 {
                    report(decks.remove_card_from_deck(card_id).await);
                } else {
                    report(decks.remove_all_card_from_deck(card_id).await);
                }
            }
        }
        _ => {
            decks.clear_selected_deck();
            return Ok(here.parent());
        }
    }
    Ok(Some(here))
}
