// Example: driving the table reducer by hand.
use lazytable::{Action, Data, Geometry, PageEntry, Plan, State, plan, window_items};

fn main() {
    let geometry = Geometry::new(40, 4);
    let mut state = State::<u32>::new();

    loop {
        match plan(&state, geometry, 1) {
            Plan::Idle => break,
            Plan::Initialize => state = state.reduce(Action::Initialize),
            Plan::Initialized => state = state.reduce(Action::Initialized),
            Plan::Load(pages) => {
                println!("loading batches {pages:?}");
                state = state.reduce(Action::Load {
                    pages: pages.clone(),
                });
                let batch = geometry.batch_size();
                for page in pages {
                    let first = (page * batch) as u32;
                    let data = Data::new(batch, 100)
                        .with_page(page, PageEntry::Loaded((first..first + batch as u32).collect()));
                    state = state.reduce(Action::Loaded { data });
                }
            }
        }
    }

    state = state.reduce(Action::Scroll { scroll_top: 86 });
    let first = geometry.first_index(state.scroll_top());
    if let Some(data) = state.data() {
        println!(
            "first={first} pixel_offset={} items={:?}",
            geometry.pixel_offset(state.scroll_top()),
            window_items(first, data)
        );
    }
    println!("next plan: {:?}", plan(&state, geometry, 1));
}
