//! Decoding recorded service responses into domain types.

use rust_decimal::Decimal;
use shop_commerce::catalog::StockStatus;
use shop_commerce::SourceError;
use shop_data::{
    decode_response, CategoriesData, CheckoutData, FetchError, PostData, PostsData, ProductData,
    ProductsData,
};

fn fixture(name: &str) -> Vec<u8> {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read(&path).unwrap_or_else(|e| panic!("reading {path}: {e}"))
}

#[test]
fn test_product_page() {
    let data: ProductsData =
        decode_response("GetProducts", 200, &fixture("products_page.json")).unwrap();
    let page = data.into_page();

    assert_eq!(page.nodes.len(), 3);
    assert!(page.page_info.has_next_page);
    assert_eq!(
        page.page_info.end_cursor.as_deref(),
        Some("YXJyYXljb25uZWN0aW9uOjI=")
    );

    let tea = &page.nodes[0];
    assert_eq!(tea.database_id, Some(1));
    assert_eq!(tea.effective_price(), Decimal::new(1250, 2));
    assert!(tea.is_on_sale());
    assert!(tea.is_in_stock());
    assert_eq!(tea.categories[0].slug, "tea");
    assert_eq!(tea.image.as_ref().unwrap().alt_text.as_deref(), Some("Tea"));
}

#[test]
fn test_missing_optional_fields_do_not_fail() {
    let data: ProductsData =
        decode_response("GetProducts", 200, &fixture("products_page.json")).unwrap();
    let page = data.into_page();

    let glass = &page.nodes[1];
    assert!(glass.image.is_none());
    assert!(glass.categories.is_empty());
    assert_eq!(glass.average_rating, None);
    assert_eq!(glass.effective_price(), Decimal::ZERO);
    assert_eq!(glass.stock_status, StockStatus::Unknown);

    let set = &page.nodes[2];
    assert_eq!(set.effective_price(), Decimal::new(40, 0));
    assert_eq!(set.stock_status, StockStatus::OnBackorder);
    assert!(!set.is_in_stock());
}

#[test]
fn test_partial_errors_keep_data() {
    let data: ProductsData =
        decode_response("GetProducts", 200, &fixture("partial_errors.json")).unwrap();
    let page = data.into_page();

    let names: Vec<_> = page.nodes.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Quince Jam", "Fig Jam"]);
    assert!(!page.page_info.has_next_page);
}

#[test]
fn test_errors_without_data_become_service_error() {
    let err = decode_response::<ProductsData>("GetProducts", 200, &fixture("errors_only.json"))
        .unwrap_err();
    assert!(matches!(err, FetchError::GraphQL(_)));

    match SourceError::from(err) {
        SourceError::Service(message) => assert!(message.contains("shareUrls")),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_post_page() {
    let data: PostsData = decode_response("GetPosts", 200, &fixture("posts_page.json")).unwrap();
    let page = data.into_page();

    assert_eq!(page.nodes.len(), 2);
    assert!(!page.page_info.has_next_page);

    let guide = &page.nodes[0];
    assert_eq!(guide.author.as_deref(), Some("Leyla"));
    assert_eq!(guide.categories[0].name, "Guides");
    let image = guide.featured_image.as_ref().unwrap();
    assert_eq!(image.alt_text, None);

    let arrivals = &page.nodes[1];
    assert!(arrivals.featured_image.is_none());
    assert!(arrivals.author.is_none());
    assert_eq!(arrivals.plain_excerpt(), "");
}

#[test]
fn test_checkout_confirmation() {
    let data: CheckoutData =
        decode_response("CreateOrder", 200, &fixture("checkout.json")).unwrap();
    let confirmation = data.into_confirmation().unwrap();

    assert_eq!(confirmation.id.as_str(), "b3JkZXI6MTAx");
    assert_eq!(confirmation.order_number.as_deref(), Some("101"));
    assert_eq!(
        confirmation.payment_url.as_deref(),
        Some("https://shop.test/checkout/order-pay/101/")
    );
}

#[test]
fn test_category_tree() {
    let data: CategoriesData =
        decode_response("GetProductCategories", 200, &fixture("categories.json")).unwrap();
    let categories = data.into_categories();

    let slugs: Vec<_> = categories.iter().map(|c| c.slug.as_str()).collect();
    assert_eq!(slugs, ["tea", "glassware"]);

    let tea = &categories[0];
    assert_eq!(tea.description.as_deref(), Some("Loose leaf and bagged teas"));
    assert_eq!(tea.children.len(), 2);
    assert_eq!(tea.children[0].name, "Green Tea");
    assert!(categories[1].image.is_none());
    assert!(categories[1].children.is_empty());
}

#[test]
fn test_product_by_slug() {
    let data: ProductData =
        decode_response("GetProductBySlug", 200, &fixture("product.json")).unwrap();
    let product = data.into_product().unwrap();

    assert_eq!(product.slug, "azerbaijani-black-tea");
    assert_eq!(product.effective_price(), Decimal::new(1250, 2));
    assert_eq!(product.review_count, 4);
    assert_eq!(product.categories[0].slug, "tea");
}

#[test]
fn test_post_by_slug() {
    let data: PostData = decode_response("GetPostBySlug", 200, &fixture("post.json")).unwrap();
    let detail = data.into_post().unwrap();

    assert_eq!(detail.post.slug, "brewing-in-a-samovar");
    assert_eq!(detail.post.author.as_deref(), Some("Leyla"));
    assert_eq!(detail.plain_content(), "Fill the samovar. Wait for the boil.");
    assert_eq!(detail.tags.len(), 1);
    assert_eq!(detail.tags[0].slug, "samovar");
}
