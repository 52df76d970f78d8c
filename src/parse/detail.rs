// src/parse/detail.rs

//! Detail page extraction.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, FieldError, Result};
use crate::models::EventDetail;
use crate::parse::period::PeriodParser;
use crate::parse::products::{ProductNormalizer, RawProduct};

/// CSS selectors for the detail page layout.
#[derive(Debug, Clone)]
pub struct DetailSelectors {
    title: Selector,
    period: Selector,
    text_rows: Selector,
    product_blocks: Selector,
    brand: Selector,
    name: Selector,
    price: Selector,
    image: Selector,
    th: Selector,
    td: Selector,
}

impl DetailSelectors {
    pub fn new() -> Result<Self> {
        Ok(Self {
            title: parse_selector("section.fixArea h2")?,
            period: parse_selector("table.info td")?,
            text_rows: parse_selector("article.noImgProduct tr")?,
            product_blocks: parse_selector("article.twoProduct figure")?,
            brand: parse_selector(".p_brandNm")?,
            name: parse_selector(".p_productNm")?,
            price: parse_selector(".p_productPrc")?,
            image: parse_selector(".p_productImg")?,
            th: parse_selector("th")?,
            td: parse_selector("td")?,
        })
    }
}

/// Turns detail page markup into an [`EventDetail`].
#[derive(Debug, Clone)]
pub struct DetailParser {
    selectors: DetailSelectors,
    periods: PeriodParser,
    products: ProductNormalizer,
}

impl DetailParser {
    pub fn new(periods: PeriodParser) -> Result<Self> {
        Ok(Self {
            selectors: DetailSelectors::new()?,
            periods,
            products: ProductNormalizer::new(),
        })
    }

    /// Parse a detail page. Missing elements become empty fields.
    pub fn parse(&self, html: &str) -> EventDetail {
        let document = Html::parse_document(html);
        let sel = &self.selectors;

        let title = first_text(&document, &sel.title, "detail title").unwrap_or_else(|e| {
            log::debug!("{e}");
            String::new()
        });
        let period_text =
            first_text(&document, &sel.period, "detail period").unwrap_or_else(|e| {
                log::debug!("{e}");
                String::new()
            });
        let (start_date, end_date) = self.periods.parse_or_empty(&period_text);

        let description_lines = document
            .select(&sel.text_rows)
            .filter_map(|row| {
                let th = row.select(&sel.th).next()?;
                let td = row.select(&sel.td).next()?;
                Some(format!("{}: {}", raw_text(th).trim(), raw_text(td).trim()))
            })
            .collect();

        let raws = document
            .select(&sel.product_blocks)
            .map(|block| self.raw_product(block));
        let products = self.products.normalize_all(raws);

        EventDetail {
            title,
            period_text,
            start_date,
            end_date,
            description_lines,
            products,
        }
    }

    fn raw_product(&self, block: ElementRef<'_>) -> RawProduct {
        let sel = &self.selectors;
        let text = |s: &Selector| block.select(s).next().map(spaced_text).unwrap_or_default();

        RawProduct {
            brand: text(&sel.brand),
            name: text(&sel.name),
            price: text(&sel.price),
            image_url: block
                .select(&sel.image)
                .next()
                .and_then(|img| img.value().attr("src"))
                .unwrap_or("")
                .to_string(),
        }
    }
}

/// Concatenated text of an element.
pub fn raw_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Trimmed text nodes of an element joined by single spaces.
pub fn spaced_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trimmed text of the first element matching `selector`.
pub fn first_text(
    document: &Html,
    selector: &Selector,
    field: &'static str,
) -> std::result::Result<String, FieldError> {
    document
        .select(selector)
        .next()
        .map(|el| raw_text(el).trim().to_string())
        .ok_or_else(|| FieldError::missing(field))
}

pub(crate) fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL_HTML: &str = r#"
        <html><body>
        <section class="fixArea"><h2> 골든듀 36주년 창립 행사 </h2></section>
        <article>
          <table class="info"><tr><th>기간</th><td>09.01(월)
             ~ 09.30(화)</td></tr></table>
        </article>
        <article class="noImgProduct">
          <table>
            <tr><th>혜택</th><td> 전 품목 10% 할인 </td></tr>
            <tr><th>장소</th><td>1F 골든듀</td></tr>
            <tr><td>라벨 없는 행</td></tr>
          </table>
        </article>
        <article class="twoProduct">
          <figure>
            <img class="p_productImg" src="https://img.example.com/ring.jpg">
            <p class="p_brandNm">#신상 골든듀</p>
            <p class="p_productNm">다이아몬드
               반지</p>
            <p class="p_productPrc">정상가 1,000,000원 <br> 판매가 800,000원</p>
          </figure>
          <figure>
            <p class="p_brandNm">사은품 증정</p>
            <p class="p_productNm">쇼핑백</p>
          </figure>
          <figure>
            <p class="p_productNm">GD12345</p>
          </figure>
        </article>
        </body></html>
    "#;

    fn parser() -> DetailParser {
        DetailParser::new(PeriodParser::new(2025)).unwrap()
    }

    #[test]
    fn test_parse_detail_page() {
        let detail = parser().parse(DETAIL_HTML);

        assert_eq!(detail.title, "골든듀 36주년 창립 행사");
        assert_eq!(detail.start_date, "2025-09-01");
        assert_eq!(detail.end_date, "2025-09-30");
        assert_eq!(
            detail.description_lines,
            vec!["혜택: 전 품목 10% 할인", "장소: 1F 골든듀"]
        );

        assert_eq!(detail.products.len(), 1);
        let product = &detail.products[0];
        assert_eq!(product.brand, "골든듀");
        assert_eq!(product.name, "다이아몬드 반지");
        assert_eq!(product.price, "<s>정상가 1,000,000원</s> 판매가 800,000원");
        assert_eq!(product.image_url, "https://img.example.com/ring.jpg");
    }

    #[test]
    fn test_missing_elements_become_empty() {
        let detail = parser().parse("<html><body><p>점검 중</p></body></html>");
        assert_eq!(detail, EventDetail::default());
    }

    #[test]
    fn test_first_text_reports_missing_field() {
        let document = Html::parse_document("<p>x</p>");
        let selector = parse_selector("h1").unwrap();
        assert_eq!(
            first_text(&document, &selector, "heading"),
            Err(FieldError::missing("heading"))
        );
    }

    #[test]
    fn test_parse_selector_invalid() {
        assert!(parse_selector("[[invalid").is_err());
    }
}
