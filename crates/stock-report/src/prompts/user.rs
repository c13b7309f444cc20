//! User message template for report generation

/// Template name of the report instructions
pub const REPORT_USER: &str = "stock.report.user";

/// Raw data first, then the fixed instructions and the report heading
pub(crate) const REPORT_USER_TEMPLATE: &str = r"
{{ data }}

---

### Instructions:
Generate a detailed stock report based on the provided data.
Include the following sections:

1. **Overview** – Brief summary of the stock's performance.
2. **Technical Analysis** – Key indicators and chart patterns.
3. **Fundamental Analysis** – Company financial, earnings, market position.
4. **Market Sentiment** – Analyst ratings and investor perception.
5. **Conclusion** – Final assessment and outlook.

- Use bullet points for clarity.
- Format using **Markdown**.
- Target audience: Investors and analysts.
- Highlight key trends or anomalies.
- Ensure the report is self-contained with no external context required.

---

Stock Report for: **{{ tickers }}**

Begin the report below:
";
